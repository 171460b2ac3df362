//! Opcode byte values and their names.
//!
//! Push opcodes (0..=79 and 81..=96) all share the name `PUSH`; the
//! remaining defined opcodes 97..=185 are named from a fixed table. Pattern
//! matching elsewhere works on these names, ignoring operands.

// ---- push opcodes ----

pub const OP_0: u8 = 0x00;
pub const OP_FALSE: u8 = OP_0;
pub const OP_DATA_1: u8 = 0x01;
pub const OP_DATA_20: u8 = 0x14;
pub const OP_DATA_33: u8 = 0x21;
pub const OP_DATA_75: u8 = 0x4b;
pub const OP_PUSHDATA1: u8 = 0x4c;
pub const OP_PUSHDATA2: u8 = 0x4d;
pub const OP_PUSHDATA4: u8 = 0x4e;
pub const OP_1NEGATE: u8 = 0x4f;
pub const OP_RESERVED: u8 = 0x50;
pub const OP_1: u8 = 0x51;
pub const OP_TRUE: u8 = OP_1;
pub const OP_2: u8 = 0x52;
pub const OP_3: u8 = 0x53;
pub const OP_16: u8 = 0x60;

// ---- named opcodes used by the interpreter and matcher ----

pub const OP_NOP: u8 = 0x61;
pub const OP_IF: u8 = 0x63;
pub const OP_NOTIF: u8 = 0x64;
pub const OP_ELSE: u8 = 0x67;
pub const OP_ENDIF: u8 = 0x68;
pub const OP_VERIFY: u8 = 0x69;
pub const OP_RETURN: u8 = 0x6a;
pub const OP_TOALTSTACK: u8 = 0x6b;
pub const OP_FROMALTSTACK: u8 = 0x6c;
pub const OP_DROP: u8 = 0x75;
pub const OP_DUP: u8 = 0x76;
pub const OP_EQUAL: u8 = 0x87;
pub const OP_EQUALVERIFY: u8 = 0x88;
pub const OP_1ADD: u8 = 0x8b;
pub const OP_ADD: u8 = 0x93;
pub const OP_LESSTHANOREQUAL: u8 = 0xa1;
pub const OP_SHA256: u8 = 0xa8;
pub const OP_HASH160: u8 = 0xa9;
pub const OP_CHECKSIG: u8 = 0xac;
pub const OP_CHECKSIGVERIFY: u8 = 0xad;
pub const OP_NOP10: u8 = 0xb9;

/// First opcode covered by `NAMED_OPCODES`.
const FIRST_NAMED: u8 = OP_NOP;

/// Names for opcodes `OP_NOP..=OP_NOP10`, indexed by `opcode - OP_NOP`.
const NAMED_OPCODES: [&str; 89] = [
    "NOP", "VER", "IF", "NOTIF", "VERIF", "VERNOTIF", "ELSE", "ENDIF", "VERIFY", "RETURN",
    "TOALTSTACK", "FROMALTSTACK", "2DROP", "2DUP", "3DUP", "2OVER", "2ROT", "2SWAP", "IFDUP",
    "DEPTH", "DROP", "DUP", "NIP", "OVER", "PICK", "ROLL", "ROT", "SWAP", "TUCK", "CAT",
    "SPLIT", "NUM2BIN", "BIN2NUM", "SIZE", "INVERT", "AND", "OR", "XOR", "EQUAL",
    "EQUALVERIFY", "RESERVED1", "RESERVED2", "1ADD", "1SUB", "2MUL", "2DIV", "NEGATE", "ABS",
    "NOT", "0NOTEQUAL", "ADD", "SUB", "MUL", "DIV", "MOD", "LSHIFT", "RSHIFT", "BOOLAND",
    "BOOLOR", "NUMEQUAL", "NUMEQUALVERIFY", "NUMNOTEQUAL", "LESSTHAN", "GREATERTHAN",
    "LESSTHANOREQUAL", "GREATERTHANOREQUAL", "MIN", "MAX", "WITHIN", "RIPEMD160", "SHA1",
    "SHA256", "HASH160", "HASH256", "CODESEPARATOR", "CHECKSIG", "CHECKSIGVERIFY",
    "CHECKMULTISIG", "CHECKMULTISIGVERIFY", "NOP1", "NOP2", "NOP3", "NOP4", "NOP5", "NOP6",
    "NOP7", "NOP8", "NOP9", "NOP10",
];

/// Name shared by every push opcode.
pub const PUSH: &str = "PUSH";

/// Name of opcodes above `OP_NOP10`.
pub const UNKNOWN: &str = "UNKNOWN";

/// Return the name of an opcode byte.
///
/// # Arguments
/// * `op` - The opcode byte.
///
/// # Returns
/// `"PUSH"` for push opcodes, `"RESERVED"` for 0x50, the table name for
/// 0x61..=0xb9, and `"UNKNOWN"` above that.
pub fn opcode_name(op: u8) -> &'static str {
    match op {
        OP_RESERVED => "RESERVED",
        OP_0..=OP_16 => PUSH,
        FIRST_NAMED..=OP_NOP10 => NAMED_OPCODES[(op - FIRST_NAMED) as usize],
        _ => UNKNOWN,
    }
}

/// Check if an opcode pushes data onto the stack.
pub fn is_push(op: u8) -> bool {
    op <= OP_16 && op != OP_RESERVED
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_names() {
        for op in [OP_0, OP_DATA_1, OP_DATA_75, OP_PUSHDATA1, OP_PUSHDATA4, OP_1NEGATE, OP_1, OP_16] {
            assert_eq!(opcode_name(op), PUSH, "opcode {:#04x}", op);
            assert!(is_push(op));
        }
        assert_eq!(opcode_name(OP_RESERVED), "RESERVED");
        assert!(!is_push(OP_RESERVED));
    }

    #[test]
    fn test_table_alignment() {
        assert_eq!(opcode_name(OP_NOP), "NOP");
        assert_eq!(opcode_name(OP_IF), "IF");
        assert_eq!(opcode_name(OP_RETURN), "RETURN");
        assert_eq!(opcode_name(OP_DUP), "DUP");
        assert_eq!(opcode_name(OP_EQUALVERIFY), "EQUALVERIFY");
        assert_eq!(opcode_name(OP_1ADD), "1ADD");
        assert_eq!(opcode_name(OP_LESSTHANOREQUAL), "LESSTHANOREQUAL");
        assert_eq!(opcode_name(OP_HASH160), "HASH160");
        assert_eq!(opcode_name(OP_CHECKSIG), "CHECKSIG");
        assert_eq!(opcode_name(OP_CHECKSIGVERIFY), "CHECKSIGVERIFY");
        assert_eq!(opcode_name(0xb0), "NOP1");
        assert_eq!(opcode_name(OP_NOP10), "NOP10");
    }

    #[test]
    fn test_unknown_range() {
        assert_eq!(opcode_name(0xba), UNKNOWN);
        assert_eq!(opcode_name(0xff), UNKNOWN);
        assert!(!is_push(0xba));
    }
}
