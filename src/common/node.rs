use super::{Coord, PickRequestItem};
use crate::error::{Diagnostic, InputError};
use crate::layout::{resolve_access_point, Facing};
use crate::map::Map;

use std::fmt;
use tracing::{debug, warn};

/// Identity of a pick stop: one face of one shelf block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StopKey {
    pub shelf_id: u32,
    pub block: Coord,
    pub facing: Facing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Start,
    Stop(StopKey),
    End,
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Start => write!(f, "start"),
            NodeId::Stop(key) => write!(f, "shelf-{}@{}{}", key.shelf_id, key.block, key.facing),
            NodeId::End => write!(f, "end"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickLine {
    pub master_item_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub coord: Coord,
    pub items: Vec<PickLine>,
}

/// `start`, the deduplicated stops in first-request order, then `end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSet {
    nodes: Vec<Node>,
}

impl NodeSet {
    pub fn build(
        map: &Map,
        items: &[PickRequestItem],
        start: Coord,
        end: Coord,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Self, InputError> {
        let mut nodes = vec![Node {
            id: NodeId::Start,
            coord: start,
            items: Vec::new(),
        }];

        for (item_index, item) in items.iter().enumerate() {
            let key = StopKey {
                shelf_id: item.shelf_id,
                block: item.location,
                facing: item.facing,
            };
            let id = NodeId::Stop(key);

            let index = match nodes.iter().position(|node| node.id == id) {
                Some(index) => index,
                None => {
                    let access = resolve_access_point(map, key.block, key.facing);
                    if let Some(reason) = access.fallback {
                        warn!("stop {id}: {reason}, falling back to shelf block {}", key.block);
                        diagnostics.push(Diagnostic::AccessPointFallback {
                            stop: id,
                            block: key.block,
                            facing: key.facing,
                            reason,
                        });
                    }
                    nodes.push(Node {
                        id,
                        coord: access.coord,
                        items: Vec::new(),
                    });
                    nodes.len() - 1
                }
            };

            let node = &mut nodes[index];
            match node
                .items
                .iter_mut()
                .find(|line| line.master_item_id == item.master_item_id)
            {
                Some(line) => {
                    line.quantity = line.quantity.checked_add(item.quantity).ok_or_else(|| {
                        InputError::InvalidQuantity {
                            index: item_index,
                            master_item_id: item.master_item_id.clone(),
                        }
                    })?;
                }
                None => node.items.push(PickLine {
                    master_item_id: item.master_item_id.clone(),
                    quantity: item.quantity,
                }),
            }
        }

        nodes.push(Node {
            id: NodeId::End,
            coord: end,
            items: Vec::new(),
        });

        debug!("node set: {} stops", nodes.len() - 2);
        Ok(NodeSet { nodes })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn start_index(&self) -> usize {
        0
    }

    pub fn end_index(&self) -> usize {
        self.nodes.len() - 1
    }

    /// Stop indices in first-request order.
    pub fn stop_indices(&self) -> std::ops::Range<usize> {
        1..self.nodes.len() - 1
    }

    pub fn node(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
}
