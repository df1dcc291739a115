//! Append-only instruction batch.
//!
//! Builders append to a caller-owned [`InstructionBatch`]; nothing here
//! removes or reorders entries. Handing the batch to a transport is the
//! caller's job.

use solana_sdk::instruction::Instruction;

/// Ordered, append-only sequence of instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionBatch {
    instructions: Vec<Instruction>,
}

impl InstructionBatch {
    /// Creates an empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an instruction to the end of the batch.
    pub fn push(&mut self, instruction: Instruction) {
        tracing::debug!(
            program_id = %instruction.program_id,
            accounts = instruction.accounts.len(),
            data_len = instruction.data.len(),
            position = self.instructions.len(),
            "appending instruction to batch"
        );
        self.instructions.push(instruction);
    }

    /// Number of instructions in the batch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns true if the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Iterates over the instructions in append order.
    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }

    /// Instructions as a slice, in append order.
    #[must_use]
    pub fn as_slice(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Consumes the batch, yielding the instructions for submission.
    #[must_use]
    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }
}

impl<'a> IntoIterator for &'a InstructionBatch {
    type Item = &'a Instruction;
    type IntoIter = std::slice::Iter<'a, Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for InstructionBatch {
    type Item = Instruction;
    type IntoIter = std::vec::IntoIter<Instruction>;

    fn into_iter(self) -> Self::IntoIter {
        self.instructions.into_iter()
    }
}

impl Extend<Instruction> for InstructionBatch {
    fn extend<I: IntoIterator<Item = Instruction>>(&mut self, iter: I) {
        for instruction in iter {
            self.push(instruction);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::pubkey::Pubkey;

    fn instruction(tag: u8) -> Instruction {
        Instruction {
            program_id: Pubkey::new_unique(),
            accounts: Vec::new(),
            data: vec![tag],
        }
    }

    #[test]
    fn test_batch_new_is_empty() {
        let batch = InstructionBatch::new();
        assert!(batch.is_empty());
        assert_eq!(batch.len(), 0);
    }

    #[test]
    fn test_batch_preserves_order() {
        let mut batch = InstructionBatch::new();
        batch.push(instruction(1));
        batch.push(instruction(2));
        batch.extend([instruction(3)]);

        let tags: Vec<u8> = batch.iter().map(|ix| ix.data[0]).collect();
        assert_eq!(tags, vec![1, 2, 3]);
        assert_eq!(batch.len(), 3);

        let owned: Vec<u8> = batch.into_instructions().iter().map(|ix| ix.data[0]).collect();
        assert_eq!(owned, vec![1, 2, 3]);
    }

    #[test]
    fn test_batch_push_keeps_existing_entries() {
        let mut batch = InstructionBatch::new();
        let first = instruction(9);
        batch.push(first.clone());
        batch.push(instruction(8));
        assert_eq!(batch.as_slice()[0], first);
    }
}
