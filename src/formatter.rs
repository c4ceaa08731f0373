//! Instruction trace formatting.
//!
//! The [`Disassembler`] turns the instruction at a program counter into a
//! [`TraceEntry`]: the decoded instruction plus the register snapshot, raw
//! bytes and symbol needed to render it. Formatters implementing
//! [`TraceFormatter`] render entries as human-readable trace lines, compact
//! lines, or JSON.

use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::debug;

use crate::cpu::{decode, DecodedInstruction, Format, MemoryImage, RegisterFile};
use crate::debugger::{format_register_dump, DebugAction, DebuggerPort, NoopDebugger, StepContext};
use crate::symbols::SymbolTable;
use crate::types::TraceOptions;

/// Number of raw bytes shown on a trace line.
const BYTE_SLOTS: usize = 4;

/// Everything needed to render one traced instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceEntry {
    pub instruction: DecodedInstruction,
    /// Raw encoding, `instruction.size` bytes.
    pub bytes: Vec<u8>,
    pub registers: RegisterFile,
    /// Word at the source operand's effective address (double-operand only).
    pub source_memory: Option<u16>,
    /// Symbol at the instruction's address.
    pub function: Option<String>,
    /// Register dump requested by the debugger.
    pub register_dump: Option<String>,
}

impl TraceEntry {
    pub fn next_address(&self) -> u16 {
        self.instruction.next_address()
    }
}

/// Trait for rendering trace entries.
pub trait TraceFormatter {
    /// Header emitted before an instruction that starts a known symbol.
    fn format_function(&self, name: &str) -> Option<String>;

    /// The instruction line itself.
    fn format_instruction(&self, entry: &TraceEntry) -> String;

    /// Register values relevant to the instruction.
    fn format_registers(&self, entry: &TraceEntry) -> Option<String>;

    /// Format the complete entry.
    ///
    /// Default implementation concatenates all component outputs, one per line.
    fn format_entry(&self, entry: &TraceEntry) -> String {
        let mut parts = Vec::new();

        if let Some(s) = entry.function.as_deref().and_then(|f| self.format_function(f)) {
            parts.push(s);
        }
        parts.push(self.format_instruction(entry));
        if let Some(s) = self.format_registers(entry) {
            parts.push(s);
        }

        let mut out = String::new();
        for part in parts {
            out.push_str(&part);
            out.push('\n');
        }
        if let Some(dump) = &entry.register_dump {
            out.push_str(dump);
        }
        out
    }
}

/// Human-readable trace formatter.
#[derive(Debug, Clone)]
pub struct HumanFormatter {
    pub show_registers: bool,
    pub show_symbols: bool,
    pub show_bytes: bool,
}

impl Default for HumanFormatter {
    fn default() -> Self {
        Self::from_options(&TraceOptions::new())
    }
}

impl HumanFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_options(options: &TraceOptions) -> Self {
        Self {
            show_registers: options.show_registers,
            show_symbols: options.show_symbols,
            show_bytes: options.show_bytes,
        }
    }

    /// The trace line proper: prefix, address, raw bytes and operation.
    pub fn instruction_line(&self, insn: &DecodedInstruction, bytes: &[u8]) -> String {
        let mut line = if insn.interrupt > 0 {
            format!("I:{} ", insn.interrupt)
        } else {
            String::from("    ")
        };
        line.push_str(&format!("{:04x}:\t", insn.address));
        if self.show_bytes {
            line.push_str(&dump_bytes(bytes));
        }
        line.push_str(&insn.text());
        line
    }

    /// Registers touched by the instruction.
    pub fn register_line(entry: &TraceEntry) -> String {
        let insn = &entry.instruction;
        let regs = &entry.registers;
        let sr = regs.status().letters();
        match insn.format {
            Format::SingleOperand => {
                let r = insn.src.map_or(0, |op| op.register);
                format!("R{}={:04x} SP={:04x}", r, regs.get(r), regs.sp())
            }
            Format::Jump => format!("SR={}", sr),
            Format::DoubleOperand => {
                let s = insn.src.map_or(0, |op| op.register);
                let d = insn.dst.map_or(0, |op| op.register);
                let mut line = format!(
                    "R{}={:04x} R{}={:04x} SR={} SP={:04x}",
                    d,
                    regs.get(d),
                    s,
                    regs.get(s),
                    sr,
                    regs.sp()
                );
                if let Some(word) = entry.source_memory {
                    line.push_str(&format!(" sMem:{:04x}", word));
                }
                line
            }
            Format::Unknown => format!("SR={} SP={:04x}", sr, regs.sp()),
        }
    }
}

impl TraceFormatter for HumanFormatter {
    fn format_function(&self, name: &str) -> Option<String> {
        if self.show_symbols {
            Some(format!("//// {}", name))
        } else {
            None
        }
    }

    fn format_instruction(&self, entry: &TraceEntry) -> String {
        self.instruction_line(&entry.instruction, &entry.bytes)
    }

    fn format_registers(&self, entry: &TraceEntry) -> Option<String> {
        if self.show_registers {
            Some(format!("\t{}", Self::register_line(entry)))
        } else {
            None
        }
    }
}

/// Compact `addr: operation` lines.
#[derive(Debug, Clone, Default)]
pub struct ShortFormatter;

impl ShortFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl TraceFormatter for ShortFormatter {
    fn format_function(&self, name: &str) -> Option<String> {
        Some(format!("{}:", name))
    }

    fn format_instruction(&self, entry: &TraceEntry) -> String {
        format!("{:04x}: {}", entry.instruction.address, entry.instruction.text())
    }

    fn format_registers(&self, _entry: &TraceEntry) -> Option<String> {
        None
    }
}

/// One JSON object per instruction.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    pub pretty: bool,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self { pretty: false }
    }

    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl TraceFormatter for JsonFormatter {
    fn format_function(&self, _name: &str) -> Option<String> {
        None
    }

    fn format_instruction(&self, entry: &TraceEntry) -> String {
        #[derive(Serialize)]
        struct JsonEntry<'a> {
            address: String,
            bytes: String,
            mnemonic: &'a str,
            text: String,
            size: u8,
            function: Option<&'a str>,
            interrupt: u8,
            registers: String,
            instruction: &'a DecodedInstruction,
        }

        let insn = &entry.instruction;
        let output = JsonEntry {
            address: format!("0x{:04x}", insn.address),
            bytes: hex::encode(&entry.bytes),
            mnemonic: insn.mnemonic.name(),
            text: insn.text(),
            size: insn.size,
            function: entry.function.as_deref(),
            interrupt: insn.interrupt,
            registers: HumanFormatter::register_line(entry),
            instruction: insn,
        };

        if self.pretty {
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string())
        }
    }

    fn format_registers(&self, _entry: &TraceEntry) -> Option<String> {
        None
    }

    fn format_entry(&self, entry: &TraceEntry) -> String {
        let mut s = self.format_instruction(entry);
        s.push('\n');
        s
    }
}

/// Raw bytes in fixed slots: `xx ` per byte, three spaces per empty slot.
fn dump_bytes(bytes: &[u8]) -> String {
    (0..BYTE_SLOTS)
        .map(|i| match bytes.get(i) {
            Some(b) => format!("{:02x} ", b),
            None => String::from("   "),
        })
        .collect()
}

impl<T: DebuggerPort> DebuggerPort for Rc<RefCell<T>> {
    fn on_instruction(&mut self, ctx: &StepContext<'_>) -> DebugAction {
        self.borrow_mut().on_instruction(ctx)
    }
}

/// Decodes instructions into trace entries, annotating symbols and
/// consulting the debugger hook when stepping.
pub struct Disassembler {
    symbols: Option<SymbolTable>,
    debugger: Option<Box<dyn DebuggerPort>>,
    options: TraceOptions,
    line_formatter: HumanFormatter,
}

impl Default for Disassembler {
    fn default() -> Self {
        Self::new(TraceOptions::new())
    }
}

impl std::fmt::Debug for Disassembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disassembler")
            .field("symbols", &self.symbols.as_ref().map(SymbolTable::len))
            .field("debugger", &self.debugger.is_some())
            .field("options", &self.options)
            .finish()
    }
}

impl Disassembler {
    pub fn new(options: TraceOptions) -> Self {
        Self {
            symbols: None,
            debugger: Some(Box::new(NoopDebugger)),
            options,
            line_formatter: HumanFormatter::from_options(&options),
        }
    }

    pub fn set_symbols(&mut self, symbols: SymbolTable) {
        self.symbols = Some(symbols);
    }

    pub fn symbols(&self) -> Option<&SymbolTable> {
        self.symbols.as_ref()
    }

    pub fn options(&self) -> &TraceOptions {
        &self.options
    }

    pub fn set_options(&mut self, options: TraceOptions) {
        self.line_formatter = HumanFormatter::from_options(&options);
        self.options = options;
    }

    /// Install a debugger hook and enable stepping.
    pub fn attach_debugger(&mut self, debugger: Box<dyn DebuggerPort>) {
        self.debugger = Some(debugger);
        self.options.step = true;
    }

    /// Remove the debugger hook; tracing continues without suspending.
    pub fn detach_debugger(&mut self) -> Option<Box<dyn DebuggerPort>> {
        self.options.step = false;
        self.debugger.take()
    }

    pub fn set_stepping(&mut self, step: bool) {
        self.options.step = step;
    }

    /// Decode and annotate the instruction at `pc`.
    pub fn disassemble(
        &mut self,
        pc: u16,
        memory: &MemoryImage,
        regs: &RegisterFile,
        interrupt: u8,
    ) -> TraceEntry {
        let (instruction, _) = decode(pc, memory, regs, interrupt);

        let source_memory = match instruction.format {
            Format::DoubleOperand => instruction
                .src
                .and_then(|op| op.effective_address())
                .map(|addr| memory.read_word(addr)),
            _ => None,
        };

        let function = self
            .symbols
            .as_ref()
            .and_then(|s| s.function_name(pc))
            .map(str::to_string);

        let mut entry = TraceEntry {
            bytes: memory.slice_wrapping(pc, usize::from(instruction.size)),
            instruction,
            registers: *regs,
            source_memory,
            function,
            register_dump: None,
        };

        if self.options.step {
            if let Some(debugger) = self.debugger.as_mut() {
                let line = self
                    .line_formatter
                    .instruction_line(&entry.instruction, &entry.bytes);
                let ctx = StepContext {
                    instruction: &entry.instruction,
                    registers: regs,
                    line: &line,
                    function: entry.function.as_deref(),
                };
                if debugger.on_instruction(&ctx) == DebugAction::DumpRegisters {
                    debug!("register dump requested at 0x{:04x}", pc);
                    entry.register_dump = Some(format_register_dump(regs));
                }
            }
        }

        entry
    }

    /// Linear sweep of `count` instructions starting at `start`.
    pub fn sweep(
        &mut self,
        start: u16,
        count: usize,
        memory: &MemoryImage,
        regs: &RegisterFile,
    ) -> Vec<TraceEntry> {
        let mut pc = start;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let entry = self.disassemble(pc, memory, regs, 0);
            pc = entry.next_address();
            entries.push(entry);
        }
        entries
    }
}
