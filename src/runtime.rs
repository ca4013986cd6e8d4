//! Fixed support procedures called by generated code.
//!
//! Both follow DOS conventions: `print_string` prints the `$`-terminated
//! bytes whose address is in `DX`; `PrintNumber` prints `AX` as a signed
//! decimal followed by CR LF. `PrintNumber` preserves every register it
//! touches.

use crate::codegen::Sink;

pub const PRINT_STRING: &str = "print_string";
pub const PRINT_NUMBER: &str = "PrintNumber";

const PRINT_STRING_BODY: &[&str] = &["    MOV AH, 09h", "    INT 21h", "    RET"];

const PRINT_NUMBER_BODY: &[&str] = &[
    "    PUSH AX",
    "    PUSH BX",
    "    PUSH CX",
    "    PUSH DX",
    "    CMP AX, 0",
    "    JG PrintNumber_digits",
    "    JE PrintNumber_zero",
    "    PUSH AX",
    "    MOV DL, '-'",
    "    MOV AH, 02h",
    "    INT 21h",
    "    POP AX",
    "    NEG AX",
    "    JMP PrintNumber_digits",
    "PrintNumber_zero:",
    "    MOV DL, '0'",
    "    MOV AH, 02h",
    "    INT 21h",
    "    JMP PrintNumber_newline",
    "PrintNumber_digits:",
    "    XOR CX, CX",
    "    MOV BX, 10",
    "PrintNumber_divide:",
    "    XOR DX, DX",
    "    DIV BX",
    "    ADD DL, '0'",
    "    PUSH DX",
    "    INC CX",
    "    CMP AX, 0",
    "    JNE PrintNumber_divide",
    "PrintNumber_print:",
    "    POP DX",
    "    MOV AH, 02h",
    "    INT 21h",
    "    LOOP PrintNumber_print",
    "PrintNumber_newline:",
    "    MOV DL, 0Dh",
    "    MOV AH, 02h",
    "    INT 21h",
    "    MOV DL, 0Ah",
    "    MOV AH, 02h",
    "    INT 21h",
    "    POP DX",
    "    POP CX",
    "    POP BX",
    "    POP AX",
    "    RET",
];

/// Append `print_string` and `PrintNumber`, in that order.
pub fn emit_runtime(sink: &mut dyn Sink) {
    emit_procedure(sink, PRINT_STRING, PRINT_STRING_BODY);
    emit_procedure(sink, PRINT_NUMBER, PRINT_NUMBER_BODY);
}

fn emit_procedure(sink: &mut dyn Sink, name: &str, body: &[&str]) {
    sink.line(format!("{} PROC", name));
    for line in body {
        sink.line(line.to_string());
    }
    sink.line(format!("{} ENDP", name));
}
