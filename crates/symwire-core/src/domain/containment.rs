//! Cycle search over the declared `contains` relation.
//!
//! Containment is a tree the user declares, not something wiring derives,
//! so cycles here are reported rather than prevented. This walk is kept
//! apart from the wiring graph: the two relations answer different
//! questions and must never share an edge set.

use std::collections::{BTreeSet, HashMap};

use crate::domain::entities::{Symbol, SymbolId};

/// All containment cycles among `symbols`, each starting at its smallest id.
///
/// Children that are not among `symbols` are ignored.
pub fn find_containment_cycles<'a>(symbols: impl IntoIterator<Item = &'a Symbol>) -> Vec<Vec<SymbolId>> {
    let children: HashMap<&SymbolId, &[SymbolId]> = symbols
        .into_iter()
        .map(|s| (s.id(), s.contains.as_slice()))
        .collect();

    let mut starts: Vec<&SymbolId> = children.keys().copied().collect();
    starts.sort();

    let mut finished: BTreeSet<&SymbolId> = BTreeSet::new();
    let mut found: BTreeSet<Vec<SymbolId>> = BTreeSet::new();

    for start in starts {
        if finished.contains(start) {
            continue;
        }

        // Each frame is (node, index of the next child to visit).
        let mut frames: Vec<(&SymbolId, usize)> = vec![(start, 0)];
        while let Some((node, cursor)) = frames.last_mut() {
            let kids = children.get(*node).copied().unwrap_or_default();
            let Some(child) = kids.get(*cursor) else {
                finished.insert(*node);
                frames.pop();
                continue;
            };
            *cursor += 1;

            if !children.contains_key(child) || finished.contains(child) {
                continue;
            }
            if let Some(pos) = frames.iter().position(|(n, _)| *n == child) {
                let members: Vec<&SymbolId> = frames[pos..].iter().map(|(n, _)| *n).collect();
                found.insert(rotate_to_smallest(&members));
                continue;
            }
            frames.push((child, 0));
        }
    }

    found.into_iter().collect()
}

/// Ids that sit on at least one containment cycle.
pub fn containment_cycle_members<'a>(symbols: impl IntoIterator<Item = &'a Symbol>) -> BTreeSet<SymbolId> {
    find_containment_cycles(symbols).into_iter().flatten().collect()
}

fn rotate_to_smallest(members: &[&SymbolId]) -> Vec<SymbolId> {
    let mut out: Vec<SymbolId> = members.iter().map(|id| (*id).clone()).collect();
    if let Some(pivot) = out
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.cmp(b.1))
        .map(|(i, _)| i)
    {
        out.rotate_left(pivot);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::version::SemVer;

    fn id(name: &str) -> SymbolId {
        SymbolId::new("sys", name, &SemVer::new(1, 0, 0))
    }

    fn module(name: &str, children: &[&str]) -> Symbol {
        children
            .iter()
            .fold(Symbol::builder("sys", name, SemVer::new(1, 0, 0)), |b, c| {
                b.contains(id(c))
            })
            .build()
            .unwrap()
    }

    #[test]
    fn tree_has_no_cycles() {
        let symbols = [module("Root", &["A", "B"]), module("A", &["C"]), module("B", &[]), module("C", &[])];
        assert!(find_containment_cycles(&symbols).is_empty());
    }

    #[test]
    fn shared_child_is_not_a_cycle() {
        let symbols = [module("A", &["C"]), module("B", &["C"]), module("C", &[])];
        assert!(find_containment_cycles(&symbols).is_empty());
    }

    #[test]
    fn loop_is_reported_once() {
        let symbols = [module("B", &["C"]), module("C", &["A"]), module("A", &["B"])];
        let cycles = find_containment_cycles(&symbols);
        assert_eq!(cycles, vec![vec![id("A"), id("B"), id("C")]]);
    }

    #[test]
    fn self_containment_is_a_cycle() {
        let symbols = [module("A", &["A"])];
        assert_eq!(find_containment_cycles(&symbols), vec![vec![id("A")]]);
        assert!(containment_cycle_members(&symbols).contains(&id("A")));
    }

    #[test]
    fn unknown_children_are_ignored() {
        let symbols = [module("A", &["Ghost"])];
        assert!(find_containment_cycles(&symbols).is_empty());
    }
}
