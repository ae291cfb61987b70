//! Transforms a flat instruction batch into a list of fused loop-nest
//! blocks.
//!
//! Three passes, applied in order:
//!
//! 1. **Singleton wrapping**: every instruction with operands becomes its
//!    own rank-0 loop nest sized to the outer extent of its dominating
//!    shape.
//! 2. **Serial adjacency fusion**: a left-to-right scan greedily absorbs
//!    following blocks into the current one while they stay data-parallel
//!    compatible, the accumulator has no pending sweeps, and the sizes
//!    either match exactly or one side is reshapable with a divisible size
//!    (in which case both sides are rebuilt at the smaller size). The scan
//!    recurses into the merged child list, fusing at every rank.
//! 3. **Empty elimination**: blocks containing no instructions, or only
//!    system opcodes, are dropped.
//!
//! Fusion must never reorder dependent writes; the data-parallel
//! compatibility predicate enforces that by requiring every operand of one
//! instruction to be either view-disjoint from or view-aligned with the
//! other's output, symmetrically.

use std::collections::HashSet;

use crate::array::{view_aligned, view_disjoint};
use crate::block::{create_nested_block, merge, Block, InstrIdx};
use crate::instr::Instruction;

/// Runs the full pass pipeline. With `fusion` disabled the serial pass is
/// skipped and every instruction stays in its own block (SIJ mode).
pub fn fuse(
    arena: &mut Vec<Instruction>,
    news: &HashSet<InstrIdx>,
    fusion: bool,
) -> Vec<Block> {
    let mut blocks = fuser_singleton(arena, news);
    if fusion {
        blocks = fuser_serial(arena, blocks, news);
    }
    remove_empty_blocks(blocks, arena)
}

/// Wraps each instruction in its own rank-0 block. Instructions without
/// operands (NONE, TALLY) are noops and are skipped.
pub fn fuser_singleton(arena: &mut Vec<Instruction>, news: &HashSet<InstrIdx>) -> Vec<Block> {
    let mut blocks = Vec::new();
    for idx in 0..arena.len() {
        if arena[idx].operands.is_empty() {
            continue;
        }
        debug_assert!(!arena[idx].dominating_shape().is_empty());
        let size = arena[idx].dominating_shape()[0];
        blocks.push(create_nested_block(arena, &[idx], 0, size, news));
    }
    blocks
}

/// Checks if two instructions support data-parallelism when merged.
///
/// System opcodes are always compatible. Otherwise every operand of one
/// instruction must be view-disjoint from, or view-aligned with, the other
/// instruction's output, in both directions.
fn data_parallel_compatible(a: &Instruction, b: &Instruction) -> bool {
    if a.opcode.is_system() || b.opcode.is_system() {
        return true;
    }
    // An instruction whose output partially overlaps one of its own inputs
    // (a shifted-self update) is order-dependent and may not fuse at all.
    for (reads, writes) in [(a, a), (b, b), (a, b), (b, a)] {
        let Some(out) = writes.out_view() else {
            continue;
        };
        for op in &reads.operands {
            if let Some(v) = op.view() {
                if !view_disjoint(v, out) && !view_aligned(v, out) {
                    return false;
                }
            }
        }
    }
    true
}

/// Checks if two blocks support data-parallelism when merged: every pair of
/// contained instructions must be compatible.
fn blocks_compatible(arena: &[Instruction], a: &Block, b: &Block) -> bool {
    let a_instr = a.all_instr();
    let b_instr = b.all_instr();
    a_instr.iter().all(|&i1| {
        b_instr
            .iter()
            .all(|&i2| data_parallel_compatible(&arena[i1], &arena[i2]))
    })
}

/// The serial adjacency fusion pass.
pub fn fuser_serial(
    arena: &mut Vec<Instruction>,
    blocks: Vec<Block>,
    news: &HashSet<InstrIdx>,
) -> Vec<Block> {
    let mut ret = Vec::new();
    let mut iter = blocks.into_iter().peekable();
    while let Some(block) = iter.next() {
        let mut cur = block;
        if cur.is_instr() {
            // Instruction blocks are never fused directly.
            ret.push(cur);
            continue;
        }
        while let Some(next) = iter.peek() {
            if next.is_instr() {
                break;
            }
            if !blocks_compatible(arena, &cur, next) {
                break;
            }
            let cur_loop = cur.as_loop().expect("accumulator is a loop block");
            if !cur_loop.sweeps.is_empty() {
                // TODO: support merging past a pending reduction.
                break;
            }
            let next_loop = next.as_loop().expect("candidates are loop blocks");
            debug_assert_eq!(cur_loop.rank, next_loop.rank);

            // Perfect match, directly mergeable.
            if cur_loop.size == next_loop.size {
                let next = iter.next().unwrap();
                cur = merge(cur, next);
                continue;
            }
            // Reshape merge: rebuild both sides at the smaller size.
            if next_loop.reshapable && next_loop.size % cur_loop.size == 0 {
                let (rank, size) = (cur_loop.rank, cur_loop.size);
                let mut instrs = cur.all_instr();
                instrs.extend(iter.next().unwrap().all_instr());
                cur = create_nested_block(arena, &instrs, rank, size, news);
                continue;
            }
            if cur_loop.reshapable && cur_loop.size % next_loop.size == 0 {
                let (rank, size) = (cur_loop.rank, next_loop.size);
                let mut instrs = cur.all_instr();
                instrs.extend(iter.next().unwrap().all_instr());
                cur = create_nested_block(arena, &instrs, rank, size, news);
                continue;
            }
            // No shape match.
            break;
        }
        // Fuse at the next rank level.
        if let Block::Loop(l) = &mut cur {
            let children = std::mem::take(&mut l.children);
            l.children = fuser_serial(arena, children, news);
        }
        ret.push(cur);
    }
    ret
}

/// Drops blocks with no instructions or only system opcodes.
pub fn remove_empty_blocks(blocks: Vec<Block>, arena: &[Instruction]) -> Vec<Block> {
    blocks
        .into_iter()
        .filter(|b| !b.all_instr().is_empty() && !b.is_system_only(arena))
        .collect()
}
