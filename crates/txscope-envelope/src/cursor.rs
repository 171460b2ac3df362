//! Forward-only cursor over a script's operations.

use txscope_script::{Operation, ScriptValue};

use crate::EnvelopeError;

/// Reads pushes off the front of an operation list.
///
/// The list itself is borrowed, never modified; only the cursor advances.
#[derive(Debug, Clone)]
pub struct OpCursor<'s> {
    ops: &'s [Operation],
    pos: usize,
}

impl<'s> OpCursor<'s> {
    pub fn new(ops: &'s [Operation]) -> Self {
        OpCursor { ops, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of operations not yet consumed.
    pub fn remaining(&self) -> usize {
        self.ops.len() - self.pos
    }

    /// The operations not yet consumed.
    pub fn rest(&self) -> &'s [Operation] {
        &self.ops[self.pos..]
    }

    /// Consume the next operation if it is a push.
    ///
    /// # Returns
    /// The pushed value, or `None` (without advancing) at the end of the
    /// list or when the next operation is not a push.
    pub fn next_push(&mut self) -> Option<ScriptValue> {
        let value = self.ops.get(self.pos)?.value()?;
        self.pos += 1;
        Some(value)
    }

    /// Consume a push the format requires.
    pub fn require_push(&mut self, what: &'static str) -> Result<ScriptValue, EnvelopeError> {
        self.next_push().ok_or(EnvelopeError::MissingPush(what))
    }

    /// Consume a push holding an item count.
    ///
    /// The count must be a non-negative script number no larger than the
    /// number of operations left, since each counted item is one push.
    pub fn require_count(&mut self, what: &'static str) -> Result<usize, EnvelopeError> {
        let value = self.require_push(what)?;
        let invalid = || EnvelopeError::InvalidCount {
            what,
            value: value.hex(),
        };
        let count = value.number().ok_or_else(invalid)?;
        usize::try_from(count)
            .ok()
            .filter(|n| *n <= self.remaining())
            .ok_or_else(invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use txscope_script::opcodes::{OP_2, OP_DUP, OP_RETURN};

    fn ops() -> Vec<Operation> {
        vec![
            Operation::opcode(OP_2),
            Operation::push(b"a").unwrap(),
            Operation::push(b"b").unwrap(),
            Operation::opcode(OP_RETURN),
        ]
    }

    #[test]
    fn test_reads_pushes_in_order() {
        let ops = ops();
        let mut cursor = OpCursor::new(&ops);
        assert_eq!(cursor.require_count("count").unwrap(), 2);
        assert_eq!(cursor.next_push().unwrap().text(), "a");
        assert_eq!(cursor.next_push().unwrap().text(), "b");
        assert_eq!(cursor.remaining(), 1);
    }

    #[test]
    fn test_stops_at_non_push() {
        let ops = ops();
        let mut cursor = OpCursor::new(&ops[3..]);
        assert!(cursor.next_push().is_none());
        assert_eq!(cursor.position(), 0);
        assert!(matches!(
            cursor.require_push("data"),
            Err(EnvelopeError::MissingPush("data"))
        ));
    }

    #[test]
    fn test_count_bounds() {
        // count of 2 with only one operation after it
        let ops = vec![Operation::opcode(OP_2), Operation::opcode(OP_DUP)];
        let mut cursor = OpCursor::new(&ops);
        assert!(matches!(
            cursor.require_count("protocol count"),
            Err(EnvelopeError::InvalidCount { what: "protocol count", .. })
        ));

        let ops = vec![Operation::push(&[0x81]).unwrap()];
        let mut cursor = OpCursor::new(&ops);
        assert!(matches!(
            cursor.require_count("data count"),
            Err(EnvelopeError::InvalidCount { .. })
        ));
    }

    #[test]
    fn test_does_not_touch_source() {
        let ops = ops();
        let mut cursor = OpCursor::new(&ops);
        while cursor.next_push().is_some() {}
        assert_eq!(cursor.rest().len(), 1);
        assert_eq!(ops.len(), 4);
    }
}
