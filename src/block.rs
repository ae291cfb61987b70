//! The block model: the nested representation of a group of fused
//! instructions.
//!
//! A block is either a leaf carrying a single instruction or a loop nest
//! carrying a rank (depth from the outermost loop), an iteration count, an
//! ordered child list, the set of sweep instructions to peel, and a flag
//! saying whether the block's iteration space may be repartitioned.
//!
//! Blocks do not own instructions; they index the batch arena held by the
//! engine for the duration of one `execute` call. Construction may mutate
//! arena instructions, but only to repartition contiguous views during a
//! reshape merge.

use std::collections::{BTreeSet, HashSet};

use crate::instr::Instruction;

/// Index of an instruction in the batch arena.
pub type InstrIdx = usize;

/// A node of the fusion tree.
#[derive(Debug, Clone)]
pub enum Block {
    /// Leaf holding one instruction.
    Instr(InstrIdx),
    /// Loop nest over a list of child blocks.
    Loop(LoopBlock),
}

/// A loop nest at one rank of the fusion tree.
#[derive(Debug, Clone)]
pub struct LoopBlock {
    /// Depth from the outermost loop; the induction variable is `i{rank}`.
    pub rank: usize,
    /// Iteration count along this rank.
    pub size: i64,
    pub children: Vec<Block>,
    /// Sweep instructions (reductions/scans over this rank) whose first
    /// iteration is peeled into an identity copy.
    pub sweeps: BTreeSet<InstrIdx>,
    /// True when every contained instruction tolerates repartitioning the
    /// iteration space.
    pub reshapable: bool,
}

impl Block {
    /// True for instruction leaves.
    pub fn is_instr(&self) -> bool {
        matches!(self, Block::Instr(_))
    }

    pub fn as_loop(&self) -> Option<&LoopBlock> {
        match self {
            Block::Loop(l) => Some(l),
            Block::Instr(_) => None,
        }
    }

    /// All instruction indices in the subtree, in emission order.
    pub fn all_instr(&self) -> Vec<InstrIdx> {
        let mut out = Vec::new();
        self.collect_instr(&mut out);
        out
    }

    fn collect_instr(&self, out: &mut Vec<InstrIdx>) {
        match self {
            Block::Instr(i) => out.push(*i),
            Block::Loop(l) => {
                for child in &l.children {
                    child.collect_instr(out);
                }
            }
        }
    }

    /// True iff every contained instruction has a system opcode.
    pub fn is_system_only(&self, arena: &[Instruction]) -> bool {
        self.all_instr()
            .iter()
            .all(|&i| arena[i].opcode.is_system())
    }

    /// Locates the leaf holding a specific instruction.
    pub fn find_instr_block(&self, idx: InstrIdx) -> Option<&Block> {
        match self {
            Block::Instr(i) => (*i == idx).then_some(self),
            Block::Loop(l) => l.children.iter().find_map(|c| c.find_instr_block(idx)),
        }
    }
}

/// Builds a loop-nest block of the given rank and size over `instrs`.
///
/// Instructions whose dominating shape extends beyond `rank + 1` get a
/// nested child chain; instructions whose extent at `rank` differs from
/// `size` are repartitioned first (only ever requested for reshapable
/// instructions, by the fuser's divisibility checks). Reductions and scans
/// sweeping this rank are registered for peeling when their output base is
/// newly written in this batch (`news`), which is what makes the
/// identity-copy peel sound: the peel initializes the output instead of
/// accumulating into stale data.
pub fn create_nested_block(
    arena: &mut [Instruction],
    instrs: &[InstrIdx],
    rank: usize,
    size: i64,
    news: &HashSet<InstrIdx>,
) -> Block {
    let mut children = Vec::with_capacity(instrs.len());
    let mut sweeps = BTreeSet::new();
    let mut reshapable = true;

    for &idx in instrs {
        let shape = arena[idx].dominating_shape().to_vec();
        let extent = shape.get(rank).copied().unwrap_or(1);
        if extent != size {
            let total: i64 = shape[rank..].iter().product();
            debug_assert!(arena[idx].reshapable());
            debug_assert_eq!(total % size, 0);
            let mut new_shape = shape[..rank].to_vec();
            new_shape.push(size);
            if total / size > 1 {
                new_shape.push(total / size);
            }
            arena[idx].reshape(&new_shape);
        }

        let shape = arena[idx].dominating_shape().to_vec();
        if shape.len() > rank + 1 {
            children.push(create_nested_block(
                arena,
                &[idx],
                rank + 1,
                shape[rank + 1],
                news,
            ));
        } else {
            children.push(Block::Instr(idx));
        }

        if arena[idx].sweep_axis() == Some(rank) && news.contains(&idx) {
            sweeps.insert(idx);
        }
        reshapable &= arena[idx].reshapable();
    }

    Block::Loop(LoopBlock {
        rank,
        size,
        children,
        sweeps,
        reshapable,
    })
}

/// Concatenates two loop blocks of equal rank and size.
pub fn merge(a: Block, b: Block) -> Block {
    let (Block::Loop(mut a), Block::Loop(b)) = (a, b) else {
        unreachable!("only loop blocks are merged");
    };
    debug_assert_eq!(a.rank, b.rank);
    debug_assert_eq!(a.size, b.size);
    a.children.extend(b.children);
    a.sweeps.extend(b.sweeps);
    a.reshapable &= b.reshapable;
    Block::Loop(a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{BaseId, View};
    use crate::instr::{Instruction, Operator};

    fn vec_view(base: usize, n: i64) -> View {
        View::contiguous(BaseId(base), &[n])
    }

    #[test]
    fn test_singleton_flat_instruction() {
        let mut arena = vec![Instruction::zip(
            Operator::Add,
            vec_view(0, 1000),
            vec_view(1, 1000),
            vec_view(2, 1000),
        )];
        let news = HashSet::from([0]);
        let block = create_nested_block(&mut arena, &[0], 0, 1000, &news);
        let l = block.as_loop().unwrap();
        assert_eq!(l.rank, 0);
        assert_eq!(l.size, 1000);
        assert_eq!(l.children.len(), 1);
        assert!(l.children[0].is_instr());
        assert!(l.sweeps.is_empty());
        assert!(l.reshapable);
    }

    #[test]
    fn test_two_dimensional_nesting() {
        let out = View::contiguous(BaseId(0), &[4, 3]);
        let input = View::contiguous(BaseId(1), &[4, 3]);
        let mut arena = vec![Instruction::map(Operator::Sqrt, out, input)];
        let block = create_nested_block(&mut arena, &[0], 0, 4, &HashSet::new());
        let outer = block.as_loop().unwrap();
        assert_eq!(outer.size, 4);
        let inner = outer.children[0].as_loop().unwrap();
        assert_eq!(inner.rank, 1);
        assert_eq!(inner.size, 3);
        assert!(inner.children[0].is_instr());
    }

    #[test]
    fn test_sweep_registered_for_new_output() {
        let mut arena = vec![Instruction::reduce(
            Operator::Add,
            vec_view(0, 1),
            vec_view(1, 100),
            0,
        )];
        let news = HashSet::from([0]);
        let block = create_nested_block(&mut arena, &[0], 0, 100, &news);
        let l = block.as_loop().unwrap();
        assert_eq!(l.sweeps.iter().copied().collect::<Vec<_>>(), vec![0]);
        assert!(!l.reshapable);
    }

    #[test]
    fn test_sweep_skipped_for_existing_output() {
        let mut arena = vec![Instruction::reduce(
            Operator::Add,
            vec_view(0, 1),
            vec_view(1, 100),
            0,
        )];
        let block = create_nested_block(&mut arena, &[0], 0, 100, &HashSet::new());
        assert!(block.as_loop().unwrap().sweeps.is_empty());
    }

    #[test]
    fn test_inner_axis_sweep_lands_on_inner_loop() {
        let out = vec_view(0, 4);
        let input = View::contiguous(BaseId(1), &[4, 100]);
        let mut arena = vec![Instruction::reduce(Operator::Add, out, input, 1)];
        let news = HashSet::from([0]);
        let block = create_nested_block(&mut arena, &[0], 0, 4, &news);
        let outer = block.as_loop().unwrap();
        assert!(outer.sweeps.is_empty());
        let inner = outer.children[0].as_loop().unwrap();
        assert_eq!(inner.size, 100);
        assert_eq!(inner.sweeps.iter().copied().collect::<Vec<_>>(), vec![0]);
    }

    #[test]
    fn test_reshape_to_smaller_outer_size() {
        let mut arena = vec![Instruction::map(
            Operator::Identity,
            vec_view(0, 12),
            vec_view(1, 12),
        )];
        let block = create_nested_block(&mut arena, &[0], 0, 3, &HashSet::new());
        let outer = block.as_loop().unwrap();
        assert_eq!(outer.size, 3);
        let inner = outer.children[0].as_loop().unwrap();
        assert_eq!(inner.size, 4);
        // The instruction's views were repartitioned to (3, 4).
        assert_eq!(arena[0].dominating_shape(), &[3, 4]);
    }

    #[test]
    fn test_all_instr_and_find() {
        let mut arena = vec![
            Instruction::map(Operator::Identity, vec_view(0, 10), vec_view(1, 10)),
            Instruction::zip(Operator::Mul, vec_view(2, 10), vec_view(0, 10), vec_view(1, 10)),
        ];
        let block = create_nested_block(&mut arena, &[0, 1], 0, 10, &HashSet::new());
        assert_eq!(block.all_instr(), vec![0, 1]);
        assert!(block.find_instr_block(1).is_some());
        assert!(block.find_instr_block(5).is_none());
    }

    #[test]
    fn test_system_only_detection() {
        let mut arena = vec![Instruction::free(vec_view(0, 10))];
        let block = create_nested_block(&mut arena, &[0], 0, 10, &HashSet::new());
        assert!(block.is_system_only(&arena));

        let mut arena2 = vec![
            Instruction::free(vec_view(0, 10)),
            Instruction::map(Operator::Identity, vec_view(1, 10), vec_view(0, 10)),
        ];
        let block2 = create_nested_block(&mut arena2, &[0, 1], 0, 10, &HashSet::new());
        assert!(!block2.is_system_only(&arena2));
    }

    #[test]
    fn test_merge_concatenates_and_unions() {
        let mut arena = vec![
            Instruction::map(Operator::Identity, vec_view(0, 10), vec_view(1, 10)),
            Instruction::zip(Operator::Add, vec_view(2, 10), vec_view(0, 10), vec_view(1, 10)),
        ];
        let a = create_nested_block(&mut arena, &[0], 0, 10, &HashSet::new());
        let b = create_nested_block(&mut arena, &[1], 0, 10, &HashSet::new());
        let merged = merge(a, b);
        let l = merged.as_loop().unwrap();
        assert_eq!(l.children.len(), 2);
        assert_eq!(merged.all_instr(), vec![0, 1]);
    }
}
