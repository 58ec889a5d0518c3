//! Detail panel view model for the selected node.

use std::fmt;

use serde::Serialize;

use crate::domain::PositionedNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeStatus {
    Leaf,
    Branch,
}

impl fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeStatus::Leaf => write!(f, "Leaf Node"),
            NodeStatus::Branch => write!(f, "Branch Node"),
        }
    }
}

/// What the detail panel shows for a selected node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeDetails {
    pub id: String,
    pub label: String,
    pub info: String,
    pub status: NodeStatus,
}

impl From<&PositionedNode> for NodeDetails {
    fn from(node: &PositionedNode) -> Self {
        Self {
            id: node.id.clone(),
            label: node.label.clone(),
            info: node.meta.clone(),
            status: if node.is_leaf {
                NodeStatus::Leaf
            } else {
                NodeStatus::Branch
            },
        }
    }
}

impl NodeDetails {
    /// Label/value rows in panel order.
    pub fn rows(&self) -> [(&'static str, String); 4] {
        [
            ("ID", self.id.clone()),
            ("Label", self.label.clone()),
            ("Info", self.info.clone()),
            ("Status", self.status.to_string()),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_leaf_node_when_building_details_then_leaf_status() {
        let node = PositionedNode {
            id: "A1-2".into(),
            label: "Task A1.2".into(),
            meta: "JWT Sign".into(),
            x: 0.0,
            y: 0.0,
            width: 160.0,
            height: 60.0,
            is_leaf: true,
            depth: 3,
            expanded: false,
        };
        let details = NodeDetails::from(&node);
        assert_eq!(details.status, NodeStatus::Leaf);
        assert_eq!(details.rows()[2], ("Info", "JWT Sign".to_string()));
        assert_eq!(details.rows()[3].1, "Leaf Node");
    }
}
