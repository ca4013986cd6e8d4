use super::Generator;
use crate::runtime::{PRINT_NUMBER, PRINT_STRING};

impl Generator<'_> {
    // ── Instruction helpers ──────────────────────────────────────────
    pub(super) fn i_mov(&mut self, dst: &str, src: &str) {
        self.inst(format!("MOV {}, {}", dst, src));
    }
    pub(super) fn i_push(&mut self, reg: &str) {
        self.inst(format!("PUSH {}", reg));
    }
    pub(super) fn i_pop(&mut self, reg: &str) {
        self.inst(format!("POP {}", reg));
    }
    pub(super) fn i_add(&mut self, dst: &str, src: &str) {
        self.inst(format!("ADD {}, {}", dst, src));
    }
    pub(super) fn i_sub(&mut self, dst: &str, src: &str) {
        self.inst(format!("SUB {}, {}", dst, src));
    }
    pub(super) fn i_mul(&mut self, src: &str) {
        self.inst(format!("MUL {}", src));
    }
    pub(super) fn i_div(&mut self, src: &str) {
        self.inst(format!("DIV {}", src));
    }
    pub(super) fn i_xor(&mut self, dst: &str, src: &str) {
        self.inst(format!("XOR {}, {}", dst, src));
    }
    pub(super) fn i_cmp(&mut self, lhs: &str, rhs: &str) {
        self.inst(format!("CMP {}, {}", lhs, rhs));
    }
    pub(super) fn i_jump(&mut self, mnemonic: &str, label: &str) {
        self.inst(format!("{} {}", mnemonic, label));
    }
    pub(super) fn i_lea(&mut self, reg: &str, label: &str) {
        self.inst(format!("LEA {}, {}", reg, label));
    }
    pub(super) fn i_call(&mut self, procedure: &str) {
        self.inst(format!("CALL {}", procedure));
    }

    // ── Memory cells ─────────────────────────────────────────────────
    pub(super) fn load_var(&mut self, name: &str) {
        self.i_mov("AX", &format!("[{}]", name));
    }
    pub(super) fn store_var(&mut self, name: &str) {
        self.i_mov(&format!("[{}]", name), "AX");
    }

    // ── Runtime calls ────────────────────────────────────────────────
    /// Print the `$`-terminated bytes at `label`.
    pub(super) fn print_label(&mut self, label: &str) {
        self.i_lea("DX", label);
        self.i_call(PRINT_STRING);
    }
    /// Print the string whose address is stored in `name`.
    pub(super) fn print_stored_string(&mut self, name: &str) {
        self.i_mov("DX", &format!("[{}]", name));
        self.i_call(PRINT_STRING);
    }
    pub(super) fn print_new_line(&mut self) {
        let label = self.data.new_line().to_string();
        self.print_label(&label);
    }
    /// Print `AX` in decimal followed by a line break.
    pub(super) fn print_ax(&mut self) {
        self.i_call(PRINT_NUMBER);
    }

    // ── Low-level output ─────────────────────────────────────────────
    pub(super) fn inst(&mut self, instruction: String) {
        self.sink.line(instruction);
    }

    pub(super) fn emit_label(&mut self, label: &str) {
        self.sink.line(format!("{}:", label));
    }
}
