//! Single-step debugger hook.
//!
//! The disassembler consults a [`DebuggerPort`] after formatting each
//! instruction while stepping is enabled. The port decides whether to
//! resume or to request a dump of the register file first. Implementations
//! never touch the console unless they are handed a reader explicitly.

use std::collections::VecDeque;
use std::io::BufRead;

use crate::cpu::{DecodedInstruction, RegisterFile};

/// What the debugger wants after seeing an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugAction {
    Resume,
    DumpRegisters,
}

/// Snapshot handed to the debugger for one instruction.
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub instruction: &'a DecodedInstruction,
    pub registers: &'a RegisterFile,
    /// The formatted trace line for the instruction.
    pub line: &'a str,
    /// Symbol at the instruction's address, if one is known.
    pub function: Option<&'a str>,
}

/// Suspend point between instructions.
pub trait DebuggerPort {
    fn on_instruction(&mut self, ctx: &StepContext<'_>) -> DebugAction;
}

/// Always resumes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopDebugger;

impl DebuggerPort for NoopDebugger {
    fn on_instruction(&mut self, _ctx: &StepContext<'_>) -> DebugAction {
        DebugAction::Resume
    }
}

/// Replays a fixed list of actions, then resumes forever.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDebugger {
    script: VecDeque<DebugAction>,
    consulted: usize,
    seen: Vec<u16>,
}

impl ScriptedDebugger {
    pub fn new<I>(actions: I) -> Self
    where
        I: IntoIterator<Item = DebugAction>,
    {
        Self {
            script: actions.into_iter().collect(),
            consulted: 0,
            seen: Vec::new(),
        }
    }

    /// Number of times the hook was invoked.
    pub fn consulted(&self) -> usize {
        self.consulted
    }

    /// Addresses of the instructions the hook was invoked for.
    pub fn seen(&self) -> &[u16] {
        &self.seen
    }
}

impl DebuggerPort for ScriptedDebugger {
    fn on_instruction(&mut self, ctx: &StepContext<'_>) -> DebugAction {
        self.consulted += 1;
        self.seen.push(ctx.instruction.address);
        self.script.pop_front().unwrap_or(DebugAction::Resume)
    }
}

/// Reads one line per instruction; a line starting with `r` asks for a
/// register dump, anything else (including end of input) resumes.
#[derive(Debug)]
pub struct LineDebugger<R> {
    input: R,
}

impl<R: BufRead> LineDebugger<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    pub fn into_inner(self) -> R {
        self.input
    }
}

impl<R: BufRead> DebuggerPort for LineDebugger<R> {
    fn on_instruction(&mut self, _ctx: &StepContext<'_>) -> DebugAction {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(n) if n > 0 && line.starts_with('r') => DebugAction::DumpRegisters,
            _ => DebugAction::Resume,
        }
    }
}

/// Render all sixteen registers, breaking the line after R7 and R14.
pub fn format_register_dump(regs: &RegisterFile) -> String {
    let mut out = String::from("Registers:\n");
    for (i, value) in regs.values().iter().enumerate() {
        out.push_str(&format!("R{}={:04x}  ", i, value));
        if i % 7 == 0 && i != 0 {
            out.push('\n');
        }
    }
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::{decode, MemoryImage};
    use std::io::Cursor;

    fn with_context<F: FnOnce(&StepContext<'_>)>(f: F) {
        let mem = MemoryImage::new();
        let regs = RegisterFile::new();
        let (insn, _) = decode(0x4000, &mem, &regs, 0);
        let ctx = StepContext {
            instruction: &insn,
            registers: &regs,
            line: "",
            function: None,
        };
        f(&ctx);
    }

    #[test]
    fn test_line_debugger() {
        let mut dbg = LineDebugger::new(Cursor::new("r\n\nregs\nx\n"));
        with_context(|ctx| {
            assert_eq!(dbg.on_instruction(ctx), DebugAction::DumpRegisters);
            assert_eq!(dbg.on_instruction(ctx), DebugAction::Resume);
            assert_eq!(dbg.on_instruction(ctx), DebugAction::DumpRegisters);
            assert_eq!(dbg.on_instruction(ctx), DebugAction::Resume);
            // End of input resumes.
            assert_eq!(dbg.on_instruction(ctx), DebugAction::Resume);
        });
    }

    #[test]
    fn test_scripted_debugger() {
        let mut dbg = ScriptedDebugger::new([DebugAction::DumpRegisters]);
        with_context(|ctx| {
            assert_eq!(dbg.on_instruction(ctx), DebugAction::DumpRegisters);
            assert_eq!(dbg.on_instruction(ctx), DebugAction::Resume);
        });
        assert_eq!(dbg.consulted(), 2);
        assert_eq!(dbg.seen(), &[0x4000, 0x4000]);
    }

    #[test]
    fn test_register_dump_layout() {
        let regs = RegisterFile::from_values([0xABCD; 16]);
        let dump = format_register_dump(&regs);
        let lines: Vec<&str> = dump.lines().collect();
        assert_eq!(lines[0], "Registers:");
        assert!(lines[1].starts_with("R0=abcd  R1=abcd"));
        assert!(lines[1].trim_end().ends_with("R7=abcd"));
        assert!(lines[2].starts_with("R8=abcd"));
        assert!(lines[2].trim_end().ends_with("R14=abcd"));
        assert_eq!(lines[3].trim_end(), "R15=abcd");
    }
}
