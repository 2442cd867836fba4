//! Arduino sketch rendering.
//!
//! The generated program runs once: `setup()` waits for the grace delay,
//! initializes the HID libraries, replays every instruction from
//! `executeEvents()` and then releases everything. `loop()` idles.

use std::fmt::Write as _;

use hidscript_common::config::RenderSettings;
use hidscript_compiler::instruction::{DeviceButton, DeviceInstruction, DeviceKey, DeviceOp};

/// Renders instruction sequences into Arduino program text.
#[derive(Debug, Clone)]
pub struct ProgramRenderer {
    settings: RenderSettings,
}

impl ProgramRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn with_defaults() -> Self {
        Self::new(RenderSettings::default())
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Render a complete program. Identical input gives identical output.
    pub fn render(&self, instructions: &[DeviceInstruction]) -> String {
        let mut out = String::with_capacity(1024 + instructions.len() * 32);
        self.write_preamble(&mut out);

        out.push_str("void executeEvents() {\n");
        write_release_all(&mut out);
        out.push('\n');
        for instruction in instructions {
            if instruction.delay_ms > 0 {
                let _ = writeln!(out, "  delay({});", instruction.delay_ms);
            }
            if let Some(call) = render_op(&instruction.op) {
                let _ = writeln!(out, "  {call}");
            }
        }
        out.push_str("}\n");
        out
    }

    fn write_preamble(&self, out: &mut String) {
        let _ = writeln!(out, "/*");
        let _ = writeln!(out, " * Generated by hidscript");
        let _ = writeln!(out, " * Target: {}", self.settings.target_name);
        let _ = writeln!(out, " */");
        out.push_str("#include <Keyboard.h>\n");
        out.push_str("#include <Mouse.h>\n");
        out.push('\n');
        out.push_str("void executeEvents();\n");
        out.push('\n');
        out.push_str("void setup() {\n");
        let _ = writeln!(out, "  delay({});", self.settings.startup_delay_ms);
        out.push_str("  Keyboard.begin();\n");
        out.push_str("  Mouse.begin();\n");
        out.push_str("  executeEvents();\n");
        write_release_all(out);
        out.push_str("}\n");
        out.push('\n');
        out.push_str("void loop() {\n");
        out.push_str("  while (1);\n");
        out.push_str("}\n");
        out.push('\n');
    }
}

fn write_release_all(out: &mut String) {
    out.push_str("  Keyboard.releaseAll();\n");
    for button in DeviceButton::ALL {
        let _ = writeln!(out, "  Mouse.release({});", button.constant());
    }
}

/// The native call for one operation. A literal key release has none:
/// `Keyboard.write` already pressed and released the character.
pub fn render_op(op: &DeviceOp) -> Option<String> {
    let call = match op {
        DeviceOp::KeyPress {
            key: DeviceKey::Literal(c),
        } => format!("Keyboard.write('{}');", escape_char(*c)),
        DeviceOp::KeyPress {
            key: DeviceKey::Constant(constant),
        } => format!("Keyboard.press({constant});"),
        DeviceOp::KeyRelease {
            key: DeviceKey::Literal(_),
        } => return None,
        DeviceOp::KeyRelease {
            key: DeviceKey::Constant(constant),
        } => format!("Keyboard.release({constant});"),
        DeviceOp::MouseMove { dx, dy } => format!("Mouse.move({dx}, {dy}, 0);"),
        DeviceOp::MousePress { button } => format!("Mouse.press({});", button.constant()),
        DeviceOp::MouseRelease { button } => format!("Mouse.release({});", button.constant()),
        DeviceOp::MouseScroll { amount } => format!("Mouse.move(0, 0, {amount});"),
    };
    Some(call)
}

/// Escape a character for use inside a C character literal.
pub fn escape_char(c: char) -> String {
    match c {
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '\t' => "\\t".to_string(),
        '\'' => "\\'".to_string(),
        '"' => "\\\"".to_string(),
        '\\' => "\\\\".to_string(),
        '\x07' => "\\a".to_string(),
        '\x08' => "\\b".to_string(),
        '\x0c' => "\\f".to_string(),
        '\x0b' => "\\v".to_string(),
        other => other.to_string(),
    }
}
