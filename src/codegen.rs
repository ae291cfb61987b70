//! C source emission for fused blocks, and kernel fingerprinting.
//!
//! A source unit is a list of blocks plus the id map of every base array
//! they reference. Emission produces a `void execute(T0 a0[], ...)` function
//! whose body is the nested loops of the blocks, and a
//! `void launcher(void* data_list[])` trampoline that casts the opaque data
//! pointers to typed arrays and calls `execute` in id order.
//!
//! Loop nests with pending sweeps get a peeled first iteration: a scope
//! pinning the induction variable to zero in which each sweep instruction is
//! emitted as an identity copy of its input, followed by the loop proper
//! starting at one. This is what initializes reduction outputs without a
//! separate fill pass.
//!
//! Emission is deterministic: equal block trees over equal id maps produce
//! byte-identical source, which is what makes the fingerprint (a SHA-256 of
//! the source) usable as the kernel-store key. The fingerprint therefore
//! captures opcodes, operand layouts, element types, shapes, strides, sweep
//! positions and nesting, all up to the consistent first-appearance renaming
//! of base ids.

use std::collections::BTreeSet;
use std::fmt::Write;

use itertools::Itertools;
use sha2::{Digest, Sha256};

use crate::array::{BasePool, IdMap, View};
use crate::block::{Block, InstrIdx, LoopBlock};
use crate::errors::EngineError;
use crate::instr::{Constant, Instruction, Opcode, Operand, Operator};
use crate::types::ElemType;

/// The inline counter-based PRNG emitted into kernels that generate random
/// data: philox2x32 with 10 rounds and a Weyl-sequence key schedule. Fully
/// parallelizable; the word at `index` depends only on (start, key, index).
const RANDOM123_SOURCE: &str = "\
static uint64_t random123(uint64_t start, uint64_t key, uint64_t index) {
    uint64_t ctr = start + index;
    uint32_t x0 = (uint32_t)ctr;
    uint32_t x1 = (uint32_t)(ctr >> 32);
    uint32_t k0 = (uint32_t)key;
    for (int r = 0; r < 10; ++r) {
        uint64_t prod = (uint64_t)0xD256D193u * x0;
        x0 = (uint32_t)(prod >> 32) ^ k0 ^ x1;
        x1 = (uint32_t)prod;
        k0 += 0x9E3779B9u;
    }
    return ((uint64_t)x1 << 32) | x0;
}
";

/// Emits the complete C source for one kernel over `blocks`.
pub fn emit_source(
    arena: &[Instruction],
    blocks: &[Block],
    ids: &IdMap,
    pool: &BasePool,
) -> Result<String, EngineError> {
    let mut out = String::new();

    out.push_str("#include <stdint.h>\n");
    out.push_str("#include <stdlib.h>\n");
    out.push_str("#include <stdbool.h>\n");
    out.push_str("#include <complex.h>\n");
    out.push_str("#include <tgmath.h>\n");
    out.push_str("#include <math.h>\n");
    out.push('\n');

    let uses_random = blocks
        .iter()
        .flat_map(Block::all_instr)
        .any(|i| arena[i].opcode == Opcode::Generate && arena[i].oper == Operator::Random);
    if uses_random {
        out.push_str(RANDOM123_SOURCE);
        out.push('\n');
    }

    // void execute(double a0[], int64_t a1[], ...)
    let params = ids
        .keys()
        .iter()
        .enumerate()
        .map(|(id, &base)| format!("{} a{id}[]", pool[base].ty().c_type()))
        .join(", ");
    let _ = writeln!(out, "void execute({params}) {{");
    for block in blocks {
        write_block(&mut out, arena, ids, pool, block, &BTreeSet::new())?;
    }
    out.push_str("}\n\n");

    // void launcher(void* data_list[]): converts the opaque pointer list to
    // typed arrays and calls execute.
    out.push_str("void launcher(void* data_list[]) {\n");
    for (id, &base) in ids.keys().iter().enumerate() {
        let _ = writeln!(
            out,
            "    {} *a{id} = data_list[{id}];",
            pool[base].ty().c_type()
        );
    }
    let args = (0..ids.len()).map(|id| format!("a{id}")).join(", ");
    let _ = writeln!(out, "    execute({args});");
    out.push_str("}\n");

    Ok(out)
}

/// SHA-256 hex fingerprint of emitted source; the kernel-store key.
pub fn fingerprint(source: &str) -> String {
    let digest = Sha256::digest(source.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

fn spaces(out: &mut String, num: usize) {
    for _ in 0..num {
        out.push(' ');
    }
}

/// Recursively emits one block. `peeled` carries the sweep instructions of
/// every enclosing peeled scope; their leaves are emitted as identity copies.
fn write_block(
    out: &mut String,
    arena: &[Instruction],
    ids: &IdMap,
    pool: &BasePool,
    block: &Block,
    peeled: &BTreeSet<InstrIdx>,
) -> Result<(), EngineError> {
    match block {
        Block::Instr(idx) => write_instr(out, arena, ids, pool, *idx, peeled),
        Block::Loop(l) => write_loop(out, arena, ids, pool, l, peeled),
    }
}

fn write_loop(
    out: &mut String,
    arena: &[Instruction],
    ids: &IdMap,
    pool: &BasePool,
    l: &LoopBlock,
    peeled: &BTreeSet<InstrIdx>,
) -> Result<(), EngineError> {
    let indent = 4 + l.rank * 4;
    let itername = format!("i{}", l.rank);

    // A swept loop is peeled: the first iteration runs in its own scope with
    // every sweep instruction replaced by an identity copy, then the loop
    // proper starts at 1.
    if !l.sweeps.is_empty() {
        let mut inner_peeled = peeled.clone();
        inner_peeled.extend(l.sweeps.iter().copied());
        spaces(out, indent);
        out.push_str("{ // Peeled loop, 1. iteration\n");
        spaces(out, indent + 4);
        let _ = writeln!(out, "uint64_t {itername} = 0;");
        for child in &l.children {
            write_block(out, arena, ids, pool, child, &inner_peeled)?;
        }
        spaces(out, indent);
        out.push_str("}\n");
    }

    spaces(out, indent);
    let start = if l.sweeps.is_empty() { 0 } else { 1 };
    let _ = writeln!(
        out,
        "for(uint64_t {itername}={start}; {itername} < {}; ++{itername}) {{",
        l.size
    );
    for child in &l.children {
        write_block(out, arena, ids, pool, child, peeled)?;
    }
    spaces(out, indent);
    out.push_str("}\n");
    Ok(())
}

/// Element index expression for a view: `offset + i0*s0 + i1*s1 + ...`.
fn view_index(v: &View) -> String {
    let mut terms = Vec::with_capacity(v.ndim() + 1);
    if v.offset != 0 {
        terms.push(v.offset.to_string());
    }
    for (d, &s) in v.stride.iter().enumerate() {
        terms.push(format!("i{d}*{s}"));
    }
    if terms.is_empty() {
        terms.push("0".to_string());
    }
    terms.join(" + ")
}

/// Index expression for a reduction output: the swept axis's induction
/// variable is dropped and the remaining variables pair with the output
/// dimensions in order. A reduction of a one-dimensional input targets a
/// scalar, indexed by its offset alone.
fn reduce_out_index(out: &View, axis: usize, in_ndim: usize) -> String {
    if in_ndim == 1 {
        return out.offset.to_string();
    }
    let mut terms = Vec::with_capacity(in_ndim);
    if out.offset != 0 {
        terms.push(out.offset.to_string());
    }
    for d in 0..in_ndim {
        if d == axis {
            continue;
        }
        let j = if d < axis { d } else { d - 1 };
        terms.push(format!("i{d}*{}", out.stride[j]));
    }
    if terms.is_empty() {
        terms.push("0".to_string());
    }
    terms.join(" + ")
}

/// C expression selecting one operand element at the current loop indices.
fn operand_expr(ids: &IdMap, op: &Operand) -> String {
    match op {
        Operand::View(v) => format!("a{}[{}]", ids.id(v.base), view_index(v)),
        Operand::Const(c) => c.c_literal(),
    }
}

/// Element type an instruction computes in: the first input operand's type.
fn input_ty(pool: &BasePool, instr: &Instruction) -> ElemType {
    instr
        .operands
        .get(1)
        .map(|op| match op {
            Operand::View(v) => pool[v.base].ty(),
            Operand::Const(c) => c.ty(),
        })
        .unwrap_or_else(|| {
            let out = instr.out_view().expect("array op has an output");
            pool[out.base].ty()
        })
}

fn type_not_supported(operator: &'static str, ty: ElemType) -> EngineError {
    EngineError::TypeNotSupported { operator, ty }
}

fn unsupported(instr: &Instruction) -> EngineError {
    EngineError::UnsupportedOperator {
        opcode: instr.opcode.name(),
        operator: instr.oper.name(),
    }
}

/// Emits the single statement realizing one instruction at the current loop
/// indices. System opcodes emit nothing; sweep instructions listed in
/// `peeled` are emitted as identity copies of their input.
fn write_instr(
    out: &mut String,
    arena: &[Instruction],
    ids: &IdMap,
    pool: &BasePool,
    idx: InstrIdx,
    peeled: &BTreeSet<InstrIdx>,
) -> Result<(), EngineError> {
    let instr = &arena[idx];
    if instr.opcode.is_system() {
        return Ok(());
    }

    let out_view = instr.out_view().expect("array op has an output view");
    let out_ref = format!("a{}[{}]", ids.id(out_view.base), view_index(out_view));
    let ty = input_ty(pool, instr);

    // Leaf indentation: one level below the innermost loop rank, which is
    // the depth of the dominating shape (deeper than the output for
    // reductions).
    let indent = 4 + instr.dominating_shape().len() * 4;
    spaces(out, indent);

    let stmt = match instr.opcode {
        Opcode::Map => {
            let x = operand_expr(ids, &instr.operands[1]);
            let expr = map_expr(instr, ty, &x)?;
            format!("{out_ref} = {expr};")
        }
        Opcode::Zip => {
            let x = operand_expr(ids, &instr.operands[1]);
            let y = operand_expr(ids, &instr.operands[2]);
            let expr = zip_expr(instr, ty, &x, &y)?;
            format!("{out_ref} = {expr};")
        }
        Opcode::Generate => generate_stmt(instr, pool, &out_ref, out_view)?,
        Opcode::Reduce => reduce_stmt(instr, ids, ty, peeled.contains(&idx))?,
        Opcode::Scan => scan_stmt(instr, ids, peeled.contains(&idx))?,
        _ => return Err(unsupported(instr)),
    };
    out.push_str(&stmt);
    out.push('\n');
    Ok(())
}

fn map_expr(instr: &Instruction, ty: ElemType, x: &str) -> Result<String, EngineError> {
    Ok(match instr.oper {
        Operator::Identity => x.to_string(),
        Operator::Negate => format!("-{x}"),
        Operator::Abs => {
            if ty == ElemType::Bool {
                return Err(type_not_supported("abs", ty));
            } else if ty.is_integer() {
                format!("({x} < 0 ? -{x} : {x})")
            } else {
                format!("fabs({x})")
            }
        }
        Operator::Sqrt => format!("sqrt({x})"),
        Operator::Exp => format!("exp({x})"),
        Operator::Log => format!("log({x})"),
        Operator::Sin => format!("sin({x})"),
        Operator::Cos => format!("cos({x})"),
        _ => return Err(unsupported(instr)),
    })
}

fn zip_expr(instr: &Instruction, ty: ElemType, x: &str, y: &str) -> Result<String, EngineError> {
    Ok(match instr.oper {
        Operator::Add => format!("{x} + {y}"),
        Operator::Sub => format!("{x} - {y}"),
        Operator::Mul => format!("{x} * {y}"),
        Operator::Div => format!("{x} / {y}"),
        Operator::Mod => {
            if ty.is_complex() {
                return Err(type_not_supported("mod", ty));
            } else if ty.is_float() {
                format!("fmod({x}, {y})")
            } else {
                format!("{x} % {y}")
            }
        }
        Operator::Pow => format!("pow({x}, {y})"),
        Operator::Min => {
            if ty.is_complex() {
                return Err(type_not_supported("min", ty));
            }
            format!("({x} < {y} ? {x} : {y})")
        }
        Operator::Max => {
            if ty.is_complex() {
                return Err(type_not_supported("max", ty));
            }
            format!("({x} < {y} ? {y} : {x})")
        }
        Operator::BitAnd | Operator::BitOr | Operator::BitXor => {
            if ty.is_float() || ty.is_complex() {
                return Err(type_not_supported("bitwise", ty));
            }
            let op = match instr.oper {
                Operator::BitAnd => "&",
                Operator::BitOr => "|",
                _ => "^",
            };
            format!("{x} {op} {y}")
        }
        Operator::Eq => format!("{x} == {y}"),
        Operator::Lt => {
            if ty.is_complex() {
                return Err(type_not_supported("lt", ty));
            }
            format!("{x} < {y}")
        }
        _ => return Err(unsupported(instr)),
    })
}

fn generate_stmt(
    instr: &Instruction,
    pool: &BasePool,
    out_ref: &str,
    out_view: &View,
) -> Result<String, EngineError> {
    match instr.oper {
        Operator::Random => {
            let Some(Constant::R123 { start, key }) = instr.constant else {
                return Err(unsupported(instr));
            };
            Ok(format!(
                "{out_ref} = random123({start}ULL, {key}ULL, {});",
                view_index(out_view)
            ))
        }
        Operator::Range => {
            let ty = pool[out_view.base].ty();
            Ok(format!(
                "{out_ref} = ({})({});",
                ty.c_type(),
                view_index(out_view)
            ))
        }
        _ => Err(unsupported(instr)),
    }
}

fn reduce_stmt(
    instr: &Instruction,
    ids: &IdMap,
    ty: ElemType,
    peel: bool,
) -> Result<String, EngineError> {
    let out_view = instr.out_view().expect("reduce has an output");
    let in_view = instr.operands[1].view().expect("reduce input is a view");
    let axis = instr.sweep_axis().expect("reduce carries its axis");

    let acc = format!(
        "a{}[{}]",
        ids.id(out_view.base),
        reduce_out_index(out_view, axis, in_view.ndim())
    );
    let x = format!("a{}[{}]", ids.id(in_view.base), view_index(in_view));

    if peel {
        return Ok(format!("{acc} = {x};"));
    }
    let expr = match instr.oper {
        Operator::Add => format!("{acc} + {x}"),
        Operator::Mul => format!("{acc} * {x}"),
        Operator::Min => {
            if ty.is_complex() {
                return Err(type_not_supported("min", ty));
            }
            format!("({acc} < {x} ? {acc} : {x})")
        }
        Operator::Max => {
            if ty.is_complex() {
                return Err(type_not_supported("max", ty));
            }
            format!("({acc} < {x} ? {x} : {acc})")
        }
        _ => return Err(unsupported(instr)),
    };
    Ok(format!("{acc} = {expr};"))
}

fn scan_stmt(instr: &Instruction, ids: &IdMap, peel: bool) -> Result<String, EngineError> {
    let out_view = instr.out_view().expect("scan has an output");
    let in_view = instr.operands[1].view().expect("scan input is a view");
    let axis = instr.sweep_axis().expect("scan carries its axis");

    let cur = format!("a{}[{}]", ids.id(out_view.base), view_index(out_view));
    let prev = format!(
        "a{}[{} - {}]",
        ids.id(out_view.base),
        view_index(out_view),
        out_view.stride[axis]
    );
    let x = format!("a{}[{}]", ids.id(in_view.base), view_index(in_view));

    if peel {
        return Ok(format!("{cur} = {x};"));
    }
    let expr = match instr.oper {
        Operator::Add => format!("{prev} + {x}"),
        Operator::Mul => format!("{prev} * {x}"),
        _ => return Err(unsupported(instr)),
    };
    Ok(format!("{cur} = {expr};"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::{BaseId, BasePool};
    use crate::fuser;
    use std::collections::HashSet;

    fn pool_of(types: &[(ElemType, usize)]) -> (BasePool, Vec<BaseId>) {
        let mut pool = BasePool::new();
        let ids = types.iter().map(|&(ty, n)| pool.create(ty, n)).collect();
        (pool, ids)
    }

    fn id_map(arena: &[Instruction]) -> IdMap {
        let mut ids = IdMap::new();
        for instr in arena {
            for base in instr.bases() {
                ids.insert(base);
            }
        }
        ids
    }

    fn emit(arena: &mut Vec<Instruction>, pool: &BasePool, news: &[usize]) -> String {
        let news: HashSet<usize> = news.iter().copied().collect();
        let blocks = fuser::fuse(arena, &news, true);
        let ids = id_map(arena);
        emit_source(arena, &blocks, &ids, pool).unwrap()
    }

    #[test]
    fn test_elementwise_add_source() {
        let (pool, b) = pool_of(&[(ElemType::F64, 1000); 3]);
        let mut arena = vec![Instruction::zip(
            Operator::Add,
            View::full(b[0], 1000),
            View::full(b[1], 1000),
            View::full(b[2], 1000),
        )];
        let src = emit(&mut arena, &pool, &[0]);

        assert!(src.contains("#include <tgmath.h>"));
        assert!(src.contains("void execute(double a0[], double a1[], double a2[]) {"));
        assert!(src.contains("for(uint64_t i0=0; i0 < 1000; ++i0) {"));
        assert!(src.contains("a0[i0*1] = a1[i0*1] + a2[i0*1];"));
        assert!(src.contains("void launcher(void* data_list[]) {"));
        assert!(src.contains("double *a1 = data_list[1];"));
        assert!(src.contains("execute(a0, a1, a2);"));
        assert!(!src.contains("random123"));
    }

    #[test]
    fn test_emission_is_deterministic() {
        let (pool, b) = pool_of(&[(ElemType::F32, 64); 3]);
        let build = || {
            vec![Instruction::zip(
                Operator::Mul,
                View::full(b[0], 64),
                View::full(b[1], 64),
                View::full(b[2], 64),
            )]
        };
        let mut arena1 = build();
        let mut arena2 = build();
        let src1 = emit(&mut arena1, &pool, &[0]);
        let src2 = emit(&mut arena2, &pool, &[0]);
        assert_eq!(src1, src2);
        assert_eq!(fingerprint(&src1), fingerprint(&src2));
    }

    #[test]
    fn test_scalar_reduction_is_peeled() {
        let (pool, b) = pool_of(&[(ElemType::F64, 1), (ElemType::F64, 100)]);
        let mut arena = vec![Instruction::reduce(
            Operator::Add,
            View::full(b[0], 1),
            View::full(b[1], 100),
            0,
        )];
        let src = emit(&mut arena, &pool, &[0]);

        assert!(src.contains("{ // Peeled loop, 1. iteration"));
        assert!(src.contains("uint64_t i0 = 0;"));
        // Peel initializes, the residual loop accumulates from 1.
        assert!(src.contains("a0[0] = a1[i0*1];"));
        assert!(src.contains("for(uint64_t i0=1; i0 < 100; ++i0) {"));
        assert!(src.contains("a0[0] = a0[0] + a1[i0*1];"));
    }

    #[test]
    fn test_existing_output_reduction_is_not_peeled() {
        let (pool, b) = pool_of(&[(ElemType::F64, 1), (ElemType::F64, 100)]);
        let mut arena = vec![Instruction::reduce(
            Operator::Add,
            View::full(b[0], 1),
            View::full(b[1], 100),
            0,
        )];
        // Output base not in the news set: accumulate into existing data.
        let src = emit(&mut arena, &pool, &[]);
        assert!(!src.contains("Peeled"));
        assert!(src.contains("for(uint64_t i0=0; i0 < 100; ++i0) {"));
    }

    #[test]
    fn test_inner_axis_reduction_indexing() {
        let (pool, b) = pool_of(&[(ElemType::F64, 4), (ElemType::F64, 400)]);
        let mut arena = vec![Instruction::reduce(
            Operator::Add,
            View::full(b[0], 4),
            View::contiguous(b[1], &[4, 100]),
            1,
        )];
        let src = emit(&mut arena, &pool, &[0]);

        // Outer loop over the kept axis, peeled inner loop over the sweep.
        assert!(src.contains("for(uint64_t i0=0; i0 < 4; ++i0) {"));
        assert!(src.contains("for(uint64_t i1=1; i1 < 100; ++i1) {"));
        // The output is indexed by the kept axis only.
        assert!(src.contains("a0[i0*1] = a0[i0*1] + a1[i0*100 + i1*1];"));
    }

    #[test]
    fn test_scan_emits_prefix_recurrence() {
        let (pool, b) = pool_of(&[(ElemType::I64, 100), (ElemType::I64, 100)]);
        let mut arena = vec![Instruction::scan(
            Operator::Add,
            View::full(b[0], 100),
            View::full(b[1], 100),
            0,
        )];
        let src = emit(&mut arena, &pool, &[0]);

        assert!(src.contains("a0[i0*1] = a1[i0*1];"));
        assert!(src.contains("a0[i0*1] = a0[i0*1 - 1] + a1[i0*1];"));
    }

    #[test]
    fn test_random_generator_is_inlined() {
        let (pool, b) = pool_of(&[(ElemType::U64, 256)]);
        let mut arena = vec![Instruction::generate(
            Operator::Random,
            View::full(b[0], 256),
            Some(Constant::R123 { start: 7, key: 42 }),
        )];
        let src = emit(&mut arena, &pool, &[0]);

        assert!(src.contains("static uint64_t random123"));
        assert!(src.contains("a0[i0*1] = random123(7ULL, 42ULL, i0*1);"));
    }

    #[test]
    fn test_range_generator_casts_flat_index() {
        let (pool, b) = pool_of(&[(ElemType::I32, 16)]);
        let mut arena = vec![Instruction::generate(
            Operator::Range,
            View::full(b[0], 16),
            None,
        )];
        let src = emit(&mut arena, &pool, &[0]);
        assert!(src.contains("a0[i0*1] = (int32_t)(i0*1);"));
        assert!(!src.contains("random123"));
    }

    #[test]
    fn test_complex_min_is_rejected() {
        let (pool, b) = pool_of(&[(ElemType::Complex128, 8); 3]);
        let mut arena = vec![Instruction::zip(
            Operator::Min,
            View::full(b[0], 8),
            View::full(b[1], 8),
            View::full(b[2], 8),
        )];
        let news: HashSet<usize> = [0].into();
        let blocks = fuser::fuse(&mut arena, &news, true);
        let ids = id_map(&arena);
        let err = emit_source(&arena, &blocks, &ids, &pool).unwrap_err();
        assert!(matches!(err, EngineError::TypeNotSupported { .. }));
    }

    #[test]
    fn test_strided_views_index_with_their_strides() {
        let (pool, b) = pool_of(&[(ElemType::F64, 10), (ElemType::F64, 20)]);
        let strided = View {
            base: b[1],
            offset: 3,
            shape: vec![10],
            stride: vec![2],
        };
        let mut arena = vec![Instruction::map(
            Operator::Identity,
            View::full(b[0], 10),
            strided,
        )];
        let src = emit(&mut arena, &pool, &[0]);
        assert!(src.contains("a0[i0*1] = a1[3 + i0*2];"));
    }

    #[test]
    fn test_fused_chain_emits_both_statements_in_one_loop() {
        let (pool, b) = pool_of(&[(ElemType::F64, 50); 5]);
        let t = View::full(b[2], 50);
        let mut arena = vec![
            Instruction::zip(
                Operator::Add,
                t.clone(),
                View::full(b[0], 50),
                View::full(b[1], 50),
            ),
            Instruction::zip(Operator::Mul, View::full(b[4], 50), t, View::full(b[3], 50)),
        ];
        let src = emit(&mut arena, &pool, &[0, 1]);
        assert_eq!(src.matches("for(uint64_t i0=0;").count(), 1);
        // Ids are assigned in first-appearance order, outputs first: the
        // temporary t is a0, its producers a1/a2, then a3/a4.
        assert!(src.contains("a0[i0*1] = a1[i0*1] + a2[i0*1];"));
        assert!(src.contains("a3[i0*1] = a0[i0*1] * a4[i0*1];"));
    }

    #[test]
    fn test_fingerprints_differ_for_different_shapes() {
        let (pool, b) = pool_of(&[(ElemType::F64, 1000), (ElemType::F64, 1000)]);
        let src_a = {
            let mut arena = vec![Instruction::map(
                Operator::Identity,
                View::full(b[0], 1000),
                View::full(b[1], 1000),
            )];
            emit(&mut arena, &pool, &[0])
        };
        let src_b = {
            let mut arena = vec![Instruction::map(
                Operator::Identity,
                View::contiguous(b[0], &[500]),
                View::contiguous(b[1], &[500]),
            )];
            emit(&mut arena, &pool, &[0])
        };
        assert_ne!(fingerprint(&src_a), fingerprint(&src_b));
        assert_eq!(fingerprint(&src_a).len(), 64);
    }
}
