//! Array instructions: opcodes, operators, constants and operands.
//!
//! An instruction pairs an opcode class (map, zip, generate, reduce, scan or
//! one of the system opcodes) with an operator (add, sqrt, min, ...) and an
//! ordered operand list. Operand 0 is the output by convention; inputs are
//! views or scalar constants. Reductions and scans carry their axis in the
//! instruction constant.

use crate::array::{BaseId, View};
use crate::types::ElemType;

/// Opcode class of an instruction.
///
/// System opcodes manage memory and ordering and never reach generated code;
/// array opcodes are what kernels are made of. `Ext` opcodes dispatch to a
/// registered extension handler and bypass the fusion pipeline entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    None,
    Sync,
    Discard,
    Free,
    Tally,
    Map,
    Zip,
    Generate,
    Reduce,
    Scan,
    Ext(u32),
}

impl Opcode {
    /// True for the memory/ordering opcodes that never emit code.
    pub fn is_system(self) -> bool {
        matches!(
            self,
            Opcode::None | Opcode::Sync | Opcode::Discard | Opcode::Free | Opcode::Tally
        )
    }

    /// True for the opcodes that emit loop-nest statements.
    pub fn is_array_op(self) -> bool {
        matches!(
            self,
            Opcode::Map | Opcode::Zip | Opcode::Generate | Opcode::Reduce | Opcode::Scan
        )
    }

    /// True for the opcodes whose first loop iteration is peeled.
    pub fn is_sweep(self) -> bool {
        matches!(self, Opcode::Reduce | Opcode::Scan)
    }

    /// True for reductions proper (output drops the swept axis).
    pub fn is_reduction(self) -> bool {
        matches!(self, Opcode::Reduce)
    }

    pub fn name(self) -> &'static str {
        match self {
            Opcode::None => "NONE",
            Opcode::Sync => "SYNC",
            Opcode::Discard => "DISCARD",
            Opcode::Free => "FREE",
            Opcode::Tally => "TALLY",
            Opcode::Map => "MAP",
            Opcode::Zip => "ZIP",
            Opcode::Generate => "GENERATE",
            Opcode::Reduce => "REDUCE",
            Opcode::Scan => "SCAN",
            Opcode::Ext(_) => "EXT",
        }
    }
}

/// Operator applied by an array instruction.
///
/// Which operators are legal for which opcode class is enforced by the code
/// generator; the enum itself is flat, mirroring the fact that the emitted C
/// expression is the only place the distinction matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Unary (MAP)
    Identity,
    Negate,
    Abs,
    Sqrt,
    Exp,
    Log,
    Sin,
    Cos,
    // Binary (ZIP); Add/Mul/Min/Max double as REDUCE/SCAN accumulators
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Pow,
    Min,
    Max,
    BitAnd,
    BitOr,
    BitXor,
    Eq,
    Lt,
    // Generators (GENERATE)
    Random,
    Range,
}

impl Operator {
    pub fn name(self) -> &'static str {
        match self {
            Operator::Identity => "identity",
            Operator::Negate => "negate",
            Operator::Abs => "abs",
            Operator::Sqrt => "sqrt",
            Operator::Exp => "exp",
            Operator::Log => "log",
            Operator::Sin => "sin",
            Operator::Cos => "cos",
            Operator::Add => "add",
            Operator::Sub => "sub",
            Operator::Mul => "mul",
            Operator::Div => "div",
            Operator::Mod => "mod",
            Operator::Pow => "pow",
            Operator::Min => "min",
            Operator::Max => "max",
            Operator::BitAnd => "bitand",
            Operator::BitOr => "bitor",
            Operator::BitXor => "bitxor",
            Operator::Eq => "eq",
            Operator::Lt => "lt",
            Operator::Random => "random",
            Operator::Range => "range",
        }
    }
}

/// A scalar constant operand or instruction attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Constant {
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    F32(f32),
    F64(f64),
    Complex64 { re: f32, im: f32 },
    Complex128 { re: f64, im: f64 },
    Bool(bool),
    /// Seed pair for the counter-based PRNG; the generated element at flat
    /// index i is `random123(start, key, i)`.
    R123 { start: u64, key: u64 },
}

impl Constant {
    pub fn ty(&self) -> ElemType {
        match self {
            Constant::I8(_) => ElemType::I8,
            Constant::I16(_) => ElemType::I16,
            Constant::I32(_) => ElemType::I32,
            Constant::I64(_) => ElemType::I64,
            Constant::U8(_) => ElemType::U8,
            Constant::U16(_) => ElemType::U16,
            Constant::U32(_) => ElemType::U32,
            Constant::U64(_) | Constant::R123 { .. } => ElemType::U64,
            Constant::F32(_) => ElemType::F32,
            Constant::F64(_) => ElemType::F64,
            Constant::Complex64 { .. } => ElemType::Complex64,
            Constant::Complex128 { .. } => ElemType::Complex128,
            Constant::Bool(_) => ElemType::Bool,
        }
    }

    /// The spelling of this constant in generated C source.
    pub fn c_literal(&self) -> String {
        match self {
            Constant::I8(v) => format!("{v}"),
            Constant::I16(v) => format!("{v}"),
            Constant::I32(v) => format!("{v}"),
            Constant::I64(v) => format!("{v}LL"),
            Constant::U8(v) => format!("{v}"),
            Constant::U16(v) => format!("{v}"),
            Constant::U32(v) => format!("{v}U"),
            Constant::U64(v) => format!("{v}ULL"),
            Constant::F32(v) => format!("{v:?}f"),
            Constant::F64(v) => format!("{v:?}"),
            Constant::Complex64 { re, im } => format!("({re:?}f + {im:?}f * I)"),
            Constant::Complex128 { re, im } => format!("({re:?} + {im:?} * I)"),
            Constant::Bool(v) => format!("{v}"),
            // R123 never appears as an element expression; the generator
            // passes start/key as arguments to random123().
            Constant::R123 { start, key } => format!("random123({start}ULL, {key}ULL, 0)"),
        }
    }

    /// The swept axis, for reductions and scans.
    pub fn as_axis(&self) -> Option<usize> {
        match self {
            Constant::I64(v) if *v >= 0 => Some(*v as usize),
            _ => None,
        }
    }
}

/// One operand of an instruction: a strided view or a scalar constant.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    View(View),
    Const(Constant),
}

impl Operand {
    pub fn is_const(&self) -> bool {
        matches!(self, Operand::Const(_))
    }

    pub fn view(&self) -> Option<&View> {
        match self {
            Operand::View(v) => Some(v),
            Operand::Const(_) => None,
        }
    }

    pub fn view_mut(&mut self) -> Option<&mut View> {
        match self {
            Operand::View(v) => Some(v),
            Operand::Const(_) => None,
        }
    }

    pub fn base(&self) -> Option<BaseId> {
        self.view().map(|v| v.base)
    }
}

impl From<View> for Operand {
    fn from(v: View) -> Self {
        Operand::View(v)
    }
}

impl From<Constant> for Operand {
    fn from(c: Constant) -> Self {
        Operand::Const(c)
    }
}

/// One primitive array operation.
///
/// Operand 0 is the output. `constant` carries the reduction/scan axis or
/// the PRNG seed; `ext` is an opaque payload forwarded to extension handlers.
#[derive(Debug, Clone, PartialEq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub oper: Operator,
    pub operands: Vec<Operand>,
    pub constant: Option<Constant>,
    pub ext: Option<Vec<u8>>,
}

impl Instruction {
    /// Unary element-wise operation: `out = oper(input)`.
    pub fn map(oper: Operator, out: View, input: impl Into<Operand>) -> Self {
        Self {
            opcode: Opcode::Map,
            oper,
            operands: vec![Operand::View(out), input.into()],
            constant: None,
            ext: None,
        }
    }

    /// Binary element-wise operation: `out = oper(in1, in2)`.
    pub fn zip(
        oper: Operator,
        out: View,
        in1: impl Into<Operand>,
        in2: impl Into<Operand>,
    ) -> Self {
        Self {
            opcode: Opcode::Zip,
            oper,
            operands: vec![Operand::View(out), in1.into(), in2.into()],
            constant: None,
            ext: None,
        }
    }

    /// Generator: fills `out` with PRNG words (`Operator::Random`, seeded by
    /// `Constant::R123`) or flat indices (`Operator::Range`).
    pub fn generate(oper: Operator, out: View, constant: Option<Constant>) -> Self {
        Self {
            opcode: Opcode::Generate,
            oper,
            operands: vec![Operand::View(out)],
            constant,
            ext: None,
        }
    }

    /// Reduction of `input` along `axis` into `out`.
    pub fn reduce(oper: Operator, out: View, input: View, axis: i64) -> Self {
        Self {
            opcode: Opcode::Reduce,
            oper,
            operands: vec![Operand::View(out), Operand::View(input)],
            constant: Some(Constant::I64(axis)),
            ext: None,
        }
    }

    /// Inclusive scan of `input` along `axis` into `out`.
    pub fn scan(oper: Operator, out: View, input: View, axis: i64) -> Self {
        Self {
            opcode: Opcode::Scan,
            oper,
            operands: vec![Operand::View(out), Operand::View(input)],
            constant: Some(Constant::I64(axis)),
            ext: None,
        }
    }

    /// Releases the base referenced by `view` back to the victim cache.
    pub fn free(view: View) -> Self {
        Self::system(Opcode::Free, vec![Operand::View(view)])
    }

    pub fn sync(view: View) -> Self {
        Self::system(Opcode::Sync, vec![Operand::View(view)])
    }

    pub fn discard(view: View) -> Self {
        Self::system(Opcode::Discard, vec![Operand::View(view)])
    }

    pub fn none() -> Self {
        Self::system(Opcode::None, vec![])
    }

    pub fn tally() -> Self {
        Self::system(Opcode::Tally, vec![])
    }

    /// Extension operation dispatched to a registered handler.
    pub fn extension(opcode_id: u32, operands: Vec<Operand>, ext: Option<Vec<u8>>) -> Self {
        Self {
            opcode: Opcode::Ext(opcode_id),
            oper: Operator::Identity,
            operands,
            constant: None,
            ext,
        }
    }

    fn system(opcode: Opcode, operands: Vec<Operand>) -> Self {
        Self {
            opcode,
            // The operator field is ignored for system opcodes.
            oper: Operator::Identity,
            operands,
            constant: None,
            ext: None,
        }
    }

    /// The output view; `None` for operand-less instructions.
    pub fn out_view(&self) -> Option<&View> {
        self.operands.first().and_then(Operand::view)
    }

    /// The shape governing this instruction's loop nest: the shape of the
    /// operand view with the most dimensions (ties resolve to the earliest
    /// operand, so a reduction is dominated by its input).
    pub fn dominating_shape(&self) -> &[i64] {
        let mut best: Option<&View> = None;
        for v in self.operands.iter().filter_map(Operand::view) {
            if best.map_or(true, |b| v.ndim() > b.ndim()) {
                best = Some(v);
            }
        }
        best.map(|v| v.shape.as_slice()).unwrap_or(&[])
    }

    /// The swept axis of a reduction or scan.
    pub fn sweep_axis(&self) -> Option<usize> {
        if !self.opcode.is_sweep() {
            return None;
        }
        self.constant.as_ref().and_then(Constant::as_axis)
    }

    /// True when the instruction's loop nest may be repartitioned over a
    /// different shape with the same element count: element-wise opcode and
    /// every view operand contiguous over the same shape.
    pub fn reshapable(&self) -> bool {
        if !matches!(self.opcode, Opcode::Map | Opcode::Zip | Opcode::Generate) {
            return false;
        }
        let shape = self.dominating_shape().to_vec();
        self.operands
            .iter()
            .filter_map(Operand::view)
            .all(|v| v.shape == shape && v.is_contiguous())
    }

    /// Repartitions every view operand over `shape`. Only legal when
    /// [`Instruction::reshapable`] holds and the element counts match.
    pub fn reshape(&mut self, shape: &[i64]) {
        debug_assert!(self.reshapable());
        for op in &mut self.operands {
            if let Some(v) = op.view_mut() {
                v.reshape(shape);
            }
        }
    }

    /// Base arrays referenced by non-constant operands, in operand order.
    pub fn bases(&self) -> impl Iterator<Item = BaseId> + '_ {
        self.operands.iter().filter_map(Operand::base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::BaseId;

    fn vec_view(base: usize, n: i64) -> View {
        View::contiguous(BaseId(base), &[n])
    }

    #[test]
    fn test_opcode_classification() {
        assert!(Opcode::Free.is_system());
        assert!(!Opcode::Free.is_array_op());
        assert!(Opcode::Reduce.is_sweep());
        assert!(Opcode::Scan.is_sweep());
        assert!(!Opcode::Scan.is_reduction());
        assert!(Opcode::Map.is_array_op());
        assert!(!Opcode::Ext(3).is_system());
    }

    #[test]
    fn test_dominating_shape_prefers_widest_operand() {
        let input = View::contiguous(BaseId(1), &[4, 100]);
        let out = View::contiguous(BaseId(0), &[4]);
        let instr = Instruction::reduce(Operator::Add, out, input, 1);
        assert_eq!(instr.dominating_shape(), &[4, 100]);
        assert_eq!(instr.sweep_axis(), Some(1));
    }

    #[test]
    fn test_zip_with_constant_is_reshapable() {
        let instr = Instruction::zip(
            Operator::Add,
            vec_view(0, 12),
            vec_view(1, 12),
            Constant::F64(1.0),
        );
        assert!(instr.reshapable());
    }

    #[test]
    fn test_strided_view_is_not_reshapable() {
        let mut strided = vec_view(1, 6);
        strided.stride = vec![2];
        let instr = Instruction::map(Operator::Identity, vec_view(0, 6), strided);
        assert!(!instr.reshapable());
    }

    #[test]
    fn test_reduce_is_not_reshapable() {
        let instr = Instruction::reduce(Operator::Add, vec_view(0, 1), vec_view(1, 100), 0);
        assert!(!instr.reshapable());
    }

    #[test]
    fn test_reshape_repartitions_views() {
        let mut instr = Instruction::zip(
            Operator::Mul,
            vec_view(0, 12),
            vec_view(1, 12),
            vec_view(2, 12),
        );
        instr.reshape(&[3, 4]);
        for op in &instr.operands {
            let v = op.view().unwrap();
            assert_eq!(v.shape, vec![3, 4]);
            assert_eq!(v.stride, vec![4, 1]);
        }
    }

    #[test]
    fn test_constant_literals() {
        assert_eq!(Constant::F64(1.0).c_literal(), "1.0");
        assert_eq!(Constant::F32(2.5).c_literal(), "2.5f");
        assert_eq!(Constant::I64(-3).c_literal(), "-3LL");
        assert_eq!(Constant::U64(7).c_literal(), "7ULL");
        assert_eq!(Constant::Bool(true).c_literal(), "true");
    }

    #[test]
    fn test_bases_skips_constants() {
        let instr = Instruction::zip(
            Operator::Add,
            vec_view(0, 4),
            vec_view(1, 4),
            Constant::F64(2.0),
        );
        let bases: Vec<_> = instr.bases().collect();
        assert_eq!(bases, vec![BaseId(0), BaseId(1)]);
    }
}
