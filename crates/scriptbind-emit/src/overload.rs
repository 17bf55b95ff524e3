//! Overload grouping by arity.
//!
//! Every binding is registered under each argument count it accepts. The
//! resulting [`ArityTable`] drives the emitted dispatcher: one switch case per
//! arity, and within a case one guarded branch per candidate in declaration
//! order.
//!
//! ## Resolution
//!
//! The first candidate whose type checks hold is invoked. Because the runtime
//! has a single number kind, overloads differing only in numeric width, or in
//! value versus pointer among numerics, resolve to whichever was declared
//! first. That imprecision is part of the contract and is preserved as is.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use scriptbind_core::{FunctionBinding, OverloadKind};

use crate::checks::{DynamicKind, signature_checks};

/// Outcome of dispatching a call against an [`ArityTable`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution<'b> {
    /// The first candidate whose predicates held.
    Matched(&'b FunctionBinding),
    /// The arity is valid but no candidate matched.
    SignatureMismatch,
    /// No binding accepts this many arguments.
    ArityMismatch,
}

/// Candidate bindings grouped by accepted argument count.
#[derive(Debug, Clone, Default)]
pub struct ArityTable<'b> {
    buckets: BTreeMap<usize, Vec<&'b FunctionBinding>>,
}

impl<'b> ArityTable<'b> {
    /// Group bindings by every arity they accept, preserving declaration order.
    pub fn build(bindings: &'b [FunctionBinding]) -> Self {
        let mut buckets: BTreeMap<usize, Vec<&'b FunctionBinding>> = BTreeMap::new();
        for binding in bindings {
            for arity in binding.arity_range() {
                buckets.entry(arity).or_default().push(binding);
            }
        }
        Self { buckets }
    }

    /// Number of distinct arities.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Check if no arity is accepted.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Accepted arities in ascending order.
    pub fn arities(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.keys().copied()
    }

    /// Candidates accepting `arity`, in declaration order.
    pub fn candidates(&self, arity: usize) -> &[&'b FunctionBinding] {
        self.buckets.get(&arity).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Buckets in ascending arity order.
    pub fn buckets(&self) -> impl Iterator<Item = (usize, &[&'b FunctionBinding])> + '_ {
        self.buckets
            .iter()
            .map(|(arity, candidates)| (*arity, candidates.as_slice()))
    }

    /// Human-readable list of the accepted arities.
    pub fn expected(&self) -> String {
        let arities: Vec<usize> = self.arities().collect();
        format_arities(&arities)
    }

    /// Evaluate the dispatch decision for arguments of the given kinds.
    pub fn resolve(&self, args: &[DynamicKind]) -> Resolution<'b> {
        let Some(candidates) = self.buckets.get(&args.len()) else {
            return Resolution::ArityMismatch;
        };

        candidates
            .iter()
            .copied()
            .find(|binding| {
                signature_checks(binding, args.len())
                    .iter()
                    .zip(args)
                    .all(|(check, kind)| check.holds(*kind))
            })
            .map_or(Resolution::SignatureMismatch, Resolution::Matched)
    }
}

/// Argument counts the dispatcher of `binding` accepts.
///
/// Functions accept their arity range. Accessors accept the read arity (the
/// instance for members, nothing otherwise) and, for variables, one more
/// argument carrying the new value.
pub fn accepted_arities(binding: &FunctionBinding) -> RangeInclusive<usize> {
    if binding.kind.is_function() {
        return binding.arity_range();
    }
    let read = usize::from(matches!(
        binding.kind,
        OverloadKind::MemberVariable | OverloadKind::MemberConstant
    ));
    let writable = matches!(
        binding.kind,
        OverloadKind::MemberVariable | OverloadKind::StaticVariable | OverloadKind::GlobalVariable
    );
    read..=read + usize::from(writable)
}

/// Every argument count a binding group accepts, ascending and deduplicated.
pub fn group_arities(bindings: &[FunctionBinding]) -> Vec<usize> {
    let arities: BTreeSet<usize> = bindings.iter().flat_map(accepted_arities).collect();
    arities.into_iter().collect()
}

/// Format a sorted list of arities as `a`, `a or b`, or `a, b or c`.
pub fn format_arities(arities: &[usize]) -> String {
    match arities {
        [] => String::new(),
        [single] => single.to_string(),
        [init @ .., last] => {
            let head: Vec<String> = init.iter().map(usize::to_string).collect();
            format!("{} or {last}", head.join(", "))
        }
    }
}
