//! Adjacent-run grouping.
//!
//! A grouping pass replaces every maximal run of consecutive siblings of one
//! type with a synthetic group node holding the run. Children are processed
//! before the run check at their level, so nesting is grouped at every depth.

use crate::TRACING_TARGET;
use crate::id::IdGenerator;
use crate::model::{Block, BlockKind, BlockType, GroupKind};

/// One grouping pass: runs of `matches` become groups of kind `into`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupPass {
    pub matches: BlockType,
    pub into: GroupKind,
}

impl GroupPass {
    /// Creates a grouping pass.
    pub const fn new(matches: BlockType, into: GroupKind) -> Self {
        Self { matches, into }
    }
}

/// Applies one grouping pass to a sibling sequence and all of its descendants.
///
/// Group ids are drawn from `ids` when a run closes, in traversal order.
pub fn group_adjacent(blocks: Vec<Block>, pass: GroupPass, ids: &IdGenerator) -> Vec<Block> {
    let mut output = Vec::with_capacity(blocks.len());
    let mut run: Vec<Block> = Vec::new();

    for mut block in blocks {
        if block.has_children {
            let children = std::mem::take(&mut block.children);
            block.children = group_adjacent(children, pass, ids);
        }

        if block.block_type() == pass.matches {
            run.push(block);
            continue;
        }

        flush(&mut run, &mut output, pass, ids);
        output.push(block);
    }

    flush(&mut run, &mut output, pass, ids);
    output
}

fn flush(run: &mut Vec<Block>, output: &mut Vec<Block>, pass: GroupPass, ids: &IdGenerator) {
    if run.is_empty() {
        return;
    }

    let members = std::mem::take(run);
    let id = ids.next_id();
    tracing::trace!(
        target: TRACING_TARGET,
        group_id = %id,
        group_kind = %pass.into,
        members = members.len(),
        "Grouped adjacent run"
    );
    output.push(Block::group(id, pass.into, members));
}

/// Replaces every synthetic group node with its members, at every depth.
///
/// Runs are maximal and the store never delivers group nodes, so this
/// restores the tree a [`Grouper`] was applied to.
pub fn ungroup(blocks: Vec<Block>) -> Vec<Block> {
    let mut output = Vec::with_capacity(blocks.len());

    for mut block in blocks {
        let children = ungroup(std::mem::take(&mut block.children));
        match block.kind {
            BlockKind::BulletedList | BlockKind::NumberedList => output.extend(children),
            _ => {
                block.children = children;
                output.push(block);
            }
        }
    }

    output
}

/// An ordered list of grouping passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grouper {
    passes: Vec<GroupPass>,
}

impl Grouper {
    /// Creates a grouper from explicit passes, applied in order.
    pub fn new(passes: Vec<GroupPass>) -> Self {
        Self { passes }
    }

    /// Returns the passes used for rendering lists.
    ///
    /// Numbered items are grouped first, then bulleted items. The order is
    /// part of the output: it fixes the sequence of generated group ids.
    pub fn standard() -> Self {
        Self::new(vec![
            GroupPass::new(BlockType::NumberedListItem, GroupKind::NumberedList),
            GroupPass::new(BlockType::BulletedListItem, GroupKind::BulletedList),
        ])
    }

    /// Applies every pass in order.
    pub fn apply(&self, blocks: Vec<Block>, ids: &IdGenerator) -> Vec<Block> {
        self.passes
            .iter()
            .fold(blocks, |blocks, pass| group_adjacent(blocks, *pass, ids))
    }

    /// Groups an already grouped tree again, drawing fresh ids from `ids`.
    ///
    /// The result equals applying the passes to the original ungrouped tree
    /// with the same generator state.
    pub fn regroup(&self, blocks: Vec<Block>, ids: &IdGenerator) -> Vec<Block> {
        self.apply(ungroup(blocks), ids)
    }
}

impl Default for Grouper {
    fn default() -> Self {
        Self::standard()
    }
}
