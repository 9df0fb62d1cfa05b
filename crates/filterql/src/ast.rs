//! Abstract Syntax Tree (AST) for filter expressions, and its evaluation.
//!
//! A [`Condition`] is built once by the parser and then evaluated any number of
//! times. Nodes are immutable: [`Condition::negate`] consumes a node and
//! returns its algebraic complement instead of flipping anything in place, so
//! a tree that has been shared behind an `Arc` can never change under a reader.

use std::fmt;
use std::ops::Not;

use crate::config::{IntMethod, StrMethod};
use crate::context::Context;
use crate::error::{EvalError, EvalResult};
use crate::value::Value;

// ==================== Literals ====================

/// A literal as written in the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal {
    /// Integer literal
    Int(i64),
    /// String literal, already unescaped
    Str(String),
}

impl Literal {
    /// The literal's type.
    pub fn kind(&self) -> LiteralKind {
        match self {
            Literal::Int(_) => LiteralKind::Int,
            Literal::Str(_) => LiteralKind::Str,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Str(s) => write!(f, "{:?}", s),
        }
    }
}

/// Static type of a literal. For a call argument it selects the method table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LiteralKind {
    /// Integer
    Int,
    /// String
    Str,
}

impl fmt::Display for LiteralKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LiteralKind::Int => f.write_str("int"),
            LiteralKind::Str => f.write_str("string"),
        }
    }
}

/// Element types that comparisons and membership tests work over.
///
/// Implemented for `i64` and `String`, the two literal types of the language.
pub trait Operand: Ord + Clone + fmt::Debug + Send + Sync + 'static {
    /// Name used in type mismatch errors.
    const TYPE_NAME: &'static str;

    /// Borrows the value as `Self` if it has exactly this type.
    fn from_value(value: &Value) -> Option<&Self>;

    /// Borrows the value as a list of `Self` if it is one.
    fn list_from_value(value: &Value) -> Option<&[Self]>;

    /// Unwraps a literal of this type.
    fn from_literal(literal: Literal) -> Option<Self>;
}

impl Operand for i64 {
    const TYPE_NAME: &'static str = "int";

    fn from_value(value: &Value) -> Option<&Self> {
        match value {
            Value::Int(n) => Some(n),
            _ => None,
        }
    }

    fn list_from_value(value: &Value) -> Option<&[Self]> {
        match value {
            Value::IntList(items) => Some(items),
            _ => None,
        }
    }

    fn from_literal(literal: Literal) -> Option<Self> {
        match literal {
            Literal::Int(n) => Some(n),
            Literal::Str(_) => None,
        }
    }
}

impl Operand for String {
    const TYPE_NAME: &'static str = "string";

    fn from_value(value: &Value) -> Option<&Self> {
        match value {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    fn list_from_value(value: &Value) -> Option<&[Self]> {
        match value {
            Value::StrList(items) => Some(items),
            _ => None,
        }
    }

    fn from_literal(literal: Literal) -> Option<Self> {
        match literal {
            Literal::Str(s) => Some(s),
            Literal::Int(_) => None,
        }
    }
}

fn expect_operand<T: Operand>(value: &Value) -> EvalResult<&T> {
    T::from_value(value).ok_or_else(|| EvalError::type_not_matched(T::TYPE_NAME, value.type_name()))
}

// ==================== Operators ====================

/// Relational operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `=`
    Eq,
    /// `<>`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
}

impl CompareOp {
    /// All operators, in declaration order.
    pub const ALL: [CompareOp; 6] = [
        CompareOp::Eq,
        CompareOp::Ne,
        CompareOp::Lt,
        CompareOp::Le,
        CompareOp::Gt,
        CompareOp::Ge,
    ];

    /// The operator that holds exactly when `self` does not.
    pub fn reverse(self) -> Self {
        match self {
            CompareOp::Eq => CompareOp::Ne,
            CompareOp::Ne => CompareOp::Eq,
            CompareOp::Lt => CompareOp::Ge,
            CompareOp::Ge => CompareOp::Lt,
            CompareOp::Le => CompareOp::Gt,
            CompareOp::Gt => CompareOp::Le,
        }
    }

    /// Applies the operator as `left <op> right`.
    pub fn apply<T: Ord + ?Sized>(self, left: &T, right: &T) -> bool {
        match self {
            CompareOp::Eq => left == right,
            CompareOp::Ne => left != right,
            CompareOp::Lt => left < right,
            CompareOp::Le => left <= right,
            CompareOp::Gt => left > right,
            CompareOp::Ge => left >= right,
        }
    }

    /// The operator as written in a query.
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// ==================== Call ====================

enum Binding<E: ?Sized> {
    Int { arg: i64, method: IntMethod<E> },
    Str { arg: String, method: StrMethod<E> },
}

impl<E: ?Sized> Clone for Binding<E> {
    fn clone(&self) -> Self {
        match self {
            Binding::Int { arg, method } => Binding::Int {
                arg: *arg,
                method: method.clone(),
            },
            Binding::Str { arg, method } => Binding::Str {
                arg: arg.clone(),
                method: method.clone(),
            },
        }
    }
}

/// One accessor invocation, e.g. `rec('Name')`.
///
/// The accessor is captured when the call is built. Changing the method
/// tables of a [`ParseConfig`](crate::ParseConfig) afterwards does not affect
/// calls that were already compiled.
pub struct Call<E: ?Sized> {
    name: String,
    binding: Binding<E>,
    negated: bool,
}

impl<E: ?Sized> Call<E> {
    /// Creates a call with an integer argument bound to `method`.
    pub fn with_int(name: impl Into<String>, arg: i64, method: IntMethod<E>) -> Self {
        Self {
            name: name.into(),
            binding: Binding::Int { arg, method },
            negated: false,
        }
    }

    /// Creates a call with a string argument bound to `method`.
    pub fn with_str(name: impl Into<String>, arg: impl Into<String>, method: StrMethod<E>) -> Self {
        Self {
            name: name.into(),
            binding: Binding::Str {
                arg: arg.into(),
                method,
            },
            negated: false,
        }
    }

    /// The call name as written in the query.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The call's argument.
    pub fn arg(&self) -> Literal {
        match &self.binding {
            Binding::Int { arg, .. } => Literal::Int(*arg),
            Binding::Str { arg, .. } => Literal::Str(arg.clone()),
        }
    }

    /// Whether the truthiness of this call is inverted.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Runs the accessor without touching any context.
    fn invoke(&self, env: &E) -> EvalResult<Value> {
        let result = match &self.binding {
            Binding::Int { arg, method } => method(env, *arg),
            Binding::Str { arg, method } => method(env, arg.as_str()),
        };
        result.map_err(EvalError::Host)
    }

    /// Runs the accessor and returns its raw value, which also becomes the
    /// context's last result.
    pub fn eval<'c>(&self, ctx: &'c mut Context<'_, E>) -> EvalResult<&'c Value> {
        let value = self.invoke(ctx.env())?;
        Ok(ctx.store_result(value))
    }

    /// Runs the accessor and interprets the value as a condition.
    pub fn is_true(&self, ctx: &mut Context<'_, E>) -> EvalResult<bool> {
        let truthy = self.eval(ctx)?.is_truthy();
        Ok(truthy != self.negated)
    }

    /// Returns the call with its truthiness inverted.
    pub fn negate(self) -> Self {
        Self {
            negated: !self.negated,
            ..self
        }
    }
}

impl<E: ?Sized> Clone for Call<E> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            binding: self.binding.clone(),
            negated: self.negated,
        }
    }
}

impl<E: ?Sized> fmt::Debug for Call<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Call")
            .field("name", &self.name)
            .field("arg", &self.arg())
            .field("negated", &self.negated)
            .finish()
    }
}

impl<E: ?Sized> fmt::Display for Call<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.arg())
    }
}

// ==================== Comparison and Membership ====================

/// `call <op> literal`
pub struct Compare<E: ?Sized, T> {
    call: Call<E>,
    op: CompareOp,
    target: T,
}

impl<E: ?Sized, T: Operand> Compare<E, T> {
    /// Creates a comparison of the call's result against `target`.
    pub fn new(call: Call<E>, op: CompareOp, target: T) -> Self {
        Self { call, op, target }
    }

    /// The call whose result is compared.
    pub fn call(&self) -> &Call<E> {
        &self.call
    }

    /// The operator.
    pub fn op(&self) -> CompareOp {
        self.op
    }

    /// The literal the call's result is compared with.
    pub fn target(&self) -> &T {
        &self.target
    }

    /// Evaluates the comparison. The call must produce a `T`.
    pub fn is_true(&self, ctx: &mut Context<'_, E>) -> EvalResult<bool> {
        let value = self.call.eval(ctx)?;
        let actual = expect_operand::<T>(value)?;
        Ok(self.op.apply(actual, &self.target))
    }

    /// Returns the comparison with the reversed operator.
    pub fn negate(self) -> Self {
        Self {
            op: self.op.reverse(),
            ..self
        }
    }
}

/// `call IN (literal, literal, ...)`
pub struct Membership<E: ?Sized, T> {
    call: Call<E>,
    choices: Vec<T>,
    negated: bool,
}

impl<E: ?Sized, T: Operand> Membership<E, T> {
    /// Creates a membership test of the call's result against `choices`.
    pub fn new(call: Call<E>, choices: Vec<T>) -> Self {
        Self {
            call,
            choices,
            negated: false,
        }
    }

    /// The call whose result is looked up.
    pub fn call(&self) -> &Call<E> {
        &self.call
    }

    /// The literal set, in query order.
    pub fn choices(&self) -> &[T] {
        &self.choices
    }

    /// Whether this is a `NOT IN` test.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Evaluates the test with a linear scan; the sets are small.
    pub fn is_true(&self, ctx: &mut Context<'_, E>) -> EvalResult<bool> {
        let value = self.call.eval(ctx)?;
        let actual = expect_operand::<T>(value)?;
        Ok(self.choices.contains(actual) != self.negated)
    }

    /// Returns the complementary test.
    pub fn negate(self) -> Self {
        Self {
            negated: !self.negated,
            ..self
        }
    }
}

/// `call <op> call`
pub struct CompareWithCall<E: ?Sized> {
    left: Call<E>,
    op: CompareOp,
    right: Call<E>,
}

impl<E: ?Sized> CompareWithCall<E> {
    /// Creates a comparison between the results of two calls.
    pub fn new(left: Call<E>, op: CompareOp, right: Call<E>) -> Self {
        Self { left, op, right }
    }

    /// The operator.
    pub fn op(&self) -> CompareOp {
        self.op
    }

    /// Evaluates both calls, then compares. Both must produce ints or both strings.
    pub fn is_true(&self, ctx: &mut Context<'_, E>) -> EvalResult<bool> {
        let left = self.left.invoke(ctx.env())?;
        let right = self.right.eval(ctx)?;
        match &left {
            Value::Int(n) => Ok(self.op.apply(n, expect_operand::<i64>(right)?)),
            Value::Str(s) => Ok(self.op.apply(s, expect_operand::<String>(right)?)),
            other => Err(EvalError::type_not_matched("int or string", other.type_name())),
        }
    }

    /// Returns the comparison with the reversed operator.
    pub fn negate(self) -> Self {
        Self {
            op: self.op.reverse(),
            ..self
        }
    }
}

/// `call IN call`, where the right call produces a list.
pub struct InWithCall<E: ?Sized> {
    left: Call<E>,
    right: Call<E>,
    negated: bool,
}

impl<E: ?Sized> InWithCall<E> {
    /// Creates a membership test of one call's result in another's list.
    pub fn new(left: Call<E>, right: Call<E>) -> Self {
        Self {
            left,
            right,
            negated: false,
        }
    }

    /// Whether this is a `NOT IN` test.
    pub fn is_negated(&self) -> bool {
        self.negated
    }

    /// Evaluates both calls, then scans the right-hand list.
    pub fn is_true(&self, ctx: &mut Context<'_, E>) -> EvalResult<bool> {
        let left = self.left.invoke(ctx.env())?;
        let right = self.right.eval(ctx)?;
        let found = match &left {
            Value::Int(n) => contains_in(n, right, "list of int")?,
            Value::Str(s) => contains_in(s, right, "list of string")?,
            other => {
                return Err(EvalError::type_not_matched(
                    "int or string",
                    other.type_name(),
                ))
            }
        };
        Ok(found != self.negated)
    }

    /// Returns the complementary test.
    pub fn negate(self) -> Self {
        Self {
            negated: !self.negated,
            ..self
        }
    }
}

fn contains_in<T: Operand>(needle: &T, haystack: &Value, expected: &'static str) -> EvalResult<bool> {
    T::list_from_value(haystack)
        .map(|items| items.contains(needle))
        .ok_or_else(|| EvalError::type_not_matched(expected, haystack.type_name()))
}

// ==================== Condition ====================

/// A compiled boolean expression.
///
/// Every variant can negate itself algebraically, so the parser never needs
/// [`Condition::Not`]. It remains available for trees built by hand and as the
/// generic fallback of [`Condition::wrap_not`].
pub enum Condition<E: ?Sized> {
    /// All children must hold; evaluated left to right, stops at the first false.
    And(Vec<Condition<E>>),

    /// Any child must hold; evaluated left to right, stops at the first true.
    Or(Vec<Condition<E>>),

    /// Inverts the child.
    Not(Box<Condition<E>>),

    /// Truthiness of a bare call.
    Call(Call<E>),

    /// Integer comparison.
    CompareInt(Compare<E, i64>),

    /// String comparison.
    CompareStr(Compare<E, String>),

    /// Comparison of two calls.
    CompareCalls(CompareWithCall<E>),

    /// Integer membership.
    InInts(Membership<E, i64>),

    /// String membership.
    InStrs(Membership<E, String>),

    /// Membership of one call's result in another call's list.
    InCall(InWithCall<E>),
}

impl<E: ?Sized> Condition<E> {
    /// Creates a conjunction; a single child is returned as is.
    pub fn and(mut children: Vec<Condition<E>>) -> Self {
        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return only;
            }
        }
        Condition::And(children)
    }

    /// Creates a disjunction; a single child is returned as is.
    pub fn or(mut children: Vec<Condition<E>>) -> Self {
        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return only;
            }
        }
        Condition::Or(children)
    }

    /// Wraps the condition in a [`Condition::Not`] node without rewriting it.
    pub fn wrap_not(inner: Condition<E>) -> Self {
        Condition::Not(Box::new(inner))
    }

    /// Returns the logical complement.
    ///
    /// De Morgan's laws push the negation down through `And`/`Or`,
    /// comparisons reverse their operator, membership tests and calls toggle
    /// their flag, and a `Not` node is unwrapped. Applying this twice yields a
    /// tree equivalent to the one it started from.
    pub fn negate(self) -> Self {
        match self {
            Condition::And(children) => {
                Condition::Or(children.into_iter().map(Condition::negate).collect())
            }
            Condition::Or(children) => {
                Condition::And(children.into_iter().map(Condition::negate).collect())
            }
            Condition::Not(inner) => *inner,
            Condition::Call(call) => Condition::Call(call.negate()),
            Condition::CompareInt(cmp) => Condition::CompareInt(cmp.negate()),
            Condition::CompareStr(cmp) => Condition::CompareStr(cmp.negate()),
            Condition::CompareCalls(cmp) => Condition::CompareCalls(cmp.negate()),
            Condition::InInts(set) => Condition::InInts(set.negate()),
            Condition::InStrs(set) => Condition::InStrs(set.negate()),
            Condition::InCall(set) => Condition::InCall(set.negate()),
        }
    }

    /// Evaluates the condition against the context's environment.
    ///
    /// The first error aborts the walk; no partial answer is produced.
    pub fn is_true(&self, ctx: &mut Context<'_, E>) -> EvalResult<bool> {
        match self {
            Condition::And(children) => {
                for child in children {
                    if !child.is_true(ctx)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Condition::Or(children) => {
                for child in children {
                    if child.is_true(ctx)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Condition::Not(inner) => Ok(!inner.is_true(ctx)?),
            Condition::Call(call) => call.is_true(ctx),
            Condition::CompareInt(cmp) => cmp.is_true(ctx),
            Condition::CompareStr(cmp) => cmp.is_true(ctx),
            Condition::CompareCalls(cmp) => cmp.is_true(ctx),
            Condition::InInts(set) => set.is_true(ctx),
            Condition::InStrs(set) => set.is_true(ctx),
            Condition::InCall(set) => set.is_true(ctx),
        }
    }

    /// Evaluates against a single environment with a throwaway context.
    pub fn matches(&self, env: &E) -> EvalResult<bool> {
        self.is_true(&mut Context::new(env))
    }

    /// Returns the records that satisfy the condition, in order.
    pub fn filter<'r>(&self, records: &'r [E]) -> EvalResult<Vec<&'r E>>
    where
        E: Sized,
    {
        let mut matched = Vec::new();
        let Some(first) = records.first() else {
            return Ok(matched);
        };
        let mut ctx = Context::new(first);
        for record in records {
            ctx.set_env(record);
            if self.is_true(&mut ctx)? {
                matched.push(record);
            }
        }
        Ok(matched)
    }

    /// Writes an indented, human-readable dump of the tree.
    pub fn print_to<W: fmt::Write + ?Sized>(&self, level: usize, out: &mut W) -> fmt::Result {
        let indent = "  ".repeat(level);
        match self {
            Condition::And(children) => print_group(out, &indent, "AND", children, level),
            Condition::Or(children) => print_group(out, &indent, "OR", children, level),
            Condition::Not(inner) => {
                writeln!(out, "{}NOT (", indent)?;
                inner.print_to(level + 1, out)?;
                writeln!(out, "{})", indent)
            }
            Condition::Call(call) => {
                let prefix = if call.negated { "NOT " } else { "" };
                writeln!(out, "{}{}{}", indent, prefix, call)
            }
            Condition::CompareInt(cmp) => {
                print_pair(out, &indent, &format!("Compare({})", cmp.op), &cmp.call, &cmp.target)
            }
            Condition::CompareStr(cmp) => {
                let target = format!("{:?}", cmp.target);
                print_pair(out, &indent, &format!("Compare({})", cmp.op), &cmp.call, &target)
            }
            Condition::CompareCalls(cmp) => {
                print_pair(out, &indent, &format!("Compare({})", cmp.op), &cmp.left, &cmp.right)
            }
            Condition::InInts(set) => print_set(out, &indent, set.negated, &set.call, &set.choices),
            Condition::InStrs(set) => print_set(out, &indent, set.negated, &set.call, &set.choices),
            Condition::InCall(set) => {
                let label = if set.negated { "NOT In" } else { "In" };
                print_pair(out, &indent, label, &set.left, &set.right)
            }
        }
    }
}

fn print_group<E: ?Sized, W: fmt::Write + ?Sized>(
    out: &mut W,
    indent: &str,
    label: &str,
    children: &[Condition<E>],
    level: usize,
) -> fmt::Result {
    writeln!(out, "{}{} (", indent, label)?;
    for child in children {
        child.print_to(level + 1, out)?;
    }
    writeln!(out, "{})", indent)
}

fn print_pair<W: fmt::Write + ?Sized>(
    out: &mut W,
    indent: &str,
    label: &str,
    left: &dyn fmt::Display,
    right: &dyn fmt::Display,
) -> fmt::Result {
    writeln!(out, "{}{} (", indent, label)?;
    writeln!(out, "{}  {}", indent, left)?;
    writeln!(out, "{}  {}", indent, right)?;
    writeln!(out, "{})", indent)
}

fn print_set<E: ?Sized, T: fmt::Debug, W: fmt::Write + ?Sized>(
    out: &mut W,
    indent: &str,
    negated: bool,
    call: &Call<E>,
    choices: &[T],
) -> fmt::Result {
    let label = if negated { "NOT In" } else { "In" };
    writeln!(out, "{}{} (", indent, label)?;
    writeln!(out, "{}  {}", indent, call)?;
    for choice in choices {
        writeln!(out, "{}  {:?}", indent, choice)?;
    }
    writeln!(out, "{})", indent)
}

impl<E: ?Sized> Not for Condition<E> {
    type Output = Condition<E>;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

impl<E: ?Sized> fmt::Display for Condition<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.print_to(0, f)
    }
}

impl<E: ?Sized> fmt::Debug for Condition<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::And(children) => f.debug_tuple("And").field(children).finish(),
            Condition::Or(children) => f.debug_tuple("Or").field(children).finish(),
            Condition::Not(inner) => f.debug_tuple("Not").field(inner).finish(),
            Condition::Call(call) => f.debug_tuple("Call").field(call).finish(),
            Condition::CompareInt(cmp) => f.debug_tuple("CompareInt").field(cmp).finish(),
            Condition::CompareStr(cmp) => f.debug_tuple("CompareStr").field(cmp).finish(),
            Condition::CompareCalls(cmp) => f.debug_tuple("CompareCalls").field(cmp).finish(),
            Condition::InInts(set) => f.debug_tuple("InInts").field(set).finish(),
            Condition::InStrs(set) => f.debug_tuple("InStrs").field(set).finish(),
            Condition::InCall(set) => f.debug_tuple("InCall").field(set).finish(),
        }
    }
}

impl<E: ?Sized> Clone for Condition<E> {
    fn clone(&self) -> Self {
        match self {
            Condition::And(children) => Condition::And(children.clone()),
            Condition::Or(children) => Condition::Or(children.clone()),
            Condition::Not(inner) => Condition::Not(inner.clone()),
            Condition::Call(call) => Condition::Call(call.clone()),
            Condition::CompareInt(cmp) => Condition::CompareInt(cmp.clone()),
            Condition::CompareStr(cmp) => Condition::CompareStr(cmp.clone()),
            Condition::CompareCalls(cmp) => Condition::CompareCalls(cmp.clone()),
            Condition::InInts(set) => Condition::InInts(set.clone()),
            Condition::InStrs(set) => Condition::InStrs(set.clone()),
            Condition::InCall(set) => Condition::InCall(set.clone()),
        }
    }
}

impl<E: ?Sized, T: Clone> Clone for Compare<E, T> {
    fn clone(&self) -> Self {
        Self {
            call: self.call.clone(),
            op: self.op,
            target: self.target.clone(),
        }
    }
}

impl<E: ?Sized, T: fmt::Debug> fmt::Debug for Compare<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Compare")
            .field("call", &self.call)
            .field("op", &self.op)
            .field("target", &self.target)
            .finish()
    }
}

impl<E: ?Sized, T: Clone> Clone for Membership<E, T> {
    fn clone(&self) -> Self {
        Self {
            call: self.call.clone(),
            choices: self.choices.clone(),
            negated: self.negated,
        }
    }
}

impl<E: ?Sized, T: fmt::Debug> fmt::Debug for Membership<E, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Membership")
            .field("call", &self.call)
            .field("choices", &self.choices)
            .field("negated", &self.negated)
            .finish()
    }
}

impl<E: ?Sized> Clone for CompareWithCall<E> {
    fn clone(&self) -> Self {
        Self {
            left: self.left.clone(),
            op: self.op,
            right: self.right.clone(),
        }
    }
}

impl<E: ?Sized> fmt::Debug for CompareWithCall<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompareWithCall")
            .field("left", &self.left)
            .field("op", &self.op)
            .field("right", &self.right)
            .finish()
    }
}

impl<E: ?Sized> Clone for InWithCall<E> {
    fn clone(&self) -> Self {
        Self {
            left: self.left.clone(),
            right: self.right.clone(),
            negated: self.negated,
        }
    }
}

impl<E: ?Sized> fmt::Debug for InWithCall<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InWithCall")
            .field("left", &self.left)
            .field("right", &self.right)
            .field("negated", &self.negated)
            .finish()
    }
}
