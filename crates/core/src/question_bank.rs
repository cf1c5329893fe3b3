// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! QuestionBank: index questions by id and by provided location (spec §4.5).
//!
//! The index is a trie keyed by Location segments. At each node, children
//! are either attribute-name edges or index-location edges; index edges are
//! themselves re-evaluated under the caller's context at lookup time so
//! that `f[x]` with `x=0` and `f[x]` with `x=1` land on distinct nodes when
//! `x` differs, while a literal `f[0]` always lands on the same node
//! regardless of context (spec §4.5, concrete scenario §8.4).

use crate::id::QuestionId;
use crate::location::{self, EvalError, Location};
use crate::question::Question;
use crate::value::Value;
use std::collections::HashMap;

#[derive(Debug, Default, Clone)]
struct TrieNode {
    /// Attribute-name children.
    attrs: HashMap<String, TrieNode>,
    /// Index children, keyed by the (possibly non-const) index Location.
    indexes: Vec<(Location, TrieNode)>,
    /// Questions whose `provides` ends exactly at this node.
    terminal: Vec<QuestionId>,
}

#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
    by_id: HashMap<QuestionId, usize>,
    /// One trie per distinct root variable name — a `Name("c")` and a
    /// `Name("d")` provider must never share a node.
    roots: HashMap<String, TrieNode>,
}

impl QuestionBank {
    /// Build a bank from a question list in declaration order. Duplicate
    /// question ids: last definition wins, as the source engine does (spec
    /// §9 Open Questions flags this for hardening, but this spec adopts the
    /// same semantics).
    pub fn build(questions: Vec<Question>) -> Self {
        let mut by_id = HashMap::new();
        for (i, q) in questions.iter().enumerate() {
            if by_id.contains_key(&q.id) {
                tracing::warn!(question_id = %q.id, "duplicate question id, last definition wins");
            }
            by_id.insert(q.id.clone(), i);
        }

        let mut roots: HashMap<String, TrieNode> = HashMap::new();
        for (i, q) in questions.iter().enumerate() {
            // Skip shadowed earlier definitions so the index agrees with
            // `by_id`'s last-wins resolution.
            if by_id.get(&q.id) != Some(&i) {
                continue;
            }
            for loc in q.provides() {
                let Some(root_name) = loc.root_name() else {
                    continue;
                };
                let root = roots.entry(root_name.to_string()).or_default();
                insert(root, &loc, q.id.clone());
            }
        }

        QuestionBank {
            questions,
            by_id,
            roots,
        }
    }

    pub fn by_id(&self, id: &QuestionId) -> Option<&Question> {
        self.by_id.get(id).map(|&i| &self.questions[i])
    }

    /// All questions whose `provides` contains the index-evaluated form of
    /// `loc`, in original declaration order.
    pub fn providing(&self, loc: &Location, ctx: &Value) -> Result<Vec<&Question>, EvalError> {
        let evaluated = location::evaluate_indexes(loc, ctx)?;
        let Some(root_name) = evaluated.root_name() else {
            return Ok(Vec::new());
        };
        let Some(root) = self.roots.get(root_name) else {
            return Ok(Vec::new());
        };
        let Some(node) = lookup(root, &evaluated, ctx)? else {
            return Ok(Vec::new());
        };
        Ok(node
            .terminal
            .iter()
            .filter_map(|id| self.by_id(id))
            .collect())
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

fn insert(root: &mut TrieNode, loc: &Location, question_id: QuestionId) {
    let node = descend_mut(root, loc);
    node.terminal.push(question_id);
}

fn descend_mut<'a>(root: &'a mut TrieNode, loc: &Location) -> &'a mut TrieNode {
    match loc {
        Location::Name(_) => root,
        Location::AttributeAccess { target, name } => {
            let parent = descend_mut(root, target);
            parent.attrs.entry(name.clone()).or_default()
        }
        Location::IndexAccess { target, index } => {
            let parent = descend_mut(root, target);
            if let Some(pos) = parent.indexes.iter().position(|(k, _)| k == index.as_ref()) {
                &mut parent.indexes[pos].1
            } else {
                parent
                    .indexes
                    .push(((**index).clone(), TrieNode::default()));
                let last = parent.indexes.len() - 1;
                &mut parent.indexes[last].1
            }
        }
        Location::Const(_) => root,
    }
}

fn lookup<'a>(
    root: &'a TrieNode,
    loc: &Location,
    ctx: &Value,
) -> Result<Option<&'a TrieNode>, EvalError> {
    match loc {
        Location::Name(_) => Ok(Some(root)),
        Location::AttributeAccess { target, name } => {
            let Some(parent) = lookup(root, target, ctx)? else {
                return Ok(None);
            };
            Ok(parent.attrs.get(name))
        }
        Location::IndexAccess { target, index } => {
            let Some(parent) = lookup(root, target, ctx)? else {
                return Ok(None);
            };
            for (key, child) in &parent.indexes {
                let evaluated_key = location::evaluate_indexes(key, ctx)?;
                if &evaluated_key == index.as_ref() {
                    return Ok(Some(child));
                }
            }
            Ok(None)
        }
        Location::Const(_) => Ok(None),
    }
}

#[cfg(test)]
#[path = "question_bank_tests.rs"]
mod tests;
