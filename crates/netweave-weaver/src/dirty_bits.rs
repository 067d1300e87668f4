//! Dirty-bit allocation.
//!
//! Every synchronized member of an inheritance chain owns one bit of a
//! 32-bit mask. A derived type resumes numbering where its base stopped,
//! so counts are recorded per type as they are allocated.

use indexmap::IndexMap;
use netweave_bytecode::{Assembly, TypeId};
use netweave_core::names;

use crate::diagnostics::{Diagnostic, DiagnosticKind, Location};
use crate::scan::{SyncMember, count_sync_members};

/// Bits available to one inheritance chain.
pub const DIRTY_BIT_BUDGET: u32 = 32;

/// Cumulative bit counts keyed by full type name.
///
/// A recorded count includes the bits of every base, so it is also the first
/// free bit for a direct subclass.
#[derive(Clone, Debug, Default)]
pub struct DirtyBitCounts {
    counts: IndexMap<String, u32>,
}

impl DirtyBitCounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, type_name: &str) -> Option<u32> {
        self.counts.get(type_name).copied()
    }

    pub fn record(&mut self, type_name: impl Into<String>, count: u32) {
        self.counts.insert(type_name.into(), count);
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Assign consecutive bits from `start` in slice order.
///
/// Returns the cumulative count to record for the type.
pub fn allocate(type_name: &str, start: u32, members: &mut [SyncMember]) -> Result<u32, Diagnostic> {
    let mut next = start;
    for member in members {
        if next >= DIRTY_BIT_BUDGET {
            return Err(Diagnostic::new(
                DiagnosticKind::DirtyBitBudget,
                Location::member(type_name, &member.name),
            )
            .message(format!("`{}` would need bit {next}", member.name)));
        }
        member.bit = next as u8;
        next += 1;
    }
    Ok(next)
}

/// First free bit for `id`, taken from its base.
pub fn start_for(assembly: &Assembly, counts: &DirtyBitCounts, id: TypeId) -> u32 {
    match assembly.base_of(id) {
        Some(base) if base != id => cumulative(assembly, counts, base),
        _ => 0,
    }
}

fn cumulative(assembly: &Assembly, counts: &DirtyBitCounts, id: TypeId) -> u32 {
    let ty = assembly.get(id);
    if ty.name == names::NETWORK_BEHAVIOUR || !assembly.is_derived_from(id, names::NETWORK_BEHAVIOUR) {
        return 0;
    }
    if let Some(count) = counts.get(&ty.name) {
        return count;
    }
    // Declared outside this batch: recount.
    start_for(assembly, counts, id) + count_sync_members(assembly, id)
}
