/*
 * Copyright (C) Oscar Shrimpton 2020
 *
 * This program is free software: you can redistribute it and/or modify it
 * under the terms of the GNU General Public License as published by the Free
 * Software Foundation, either version 3 of the License, or (at your option)
 * any later version.
 *
 * This program is distributed in the hope that it will be useful, but WITHOUT
 * ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or
 * FITNESS FOR A PARTICULAR PURPOSE.  See the GNU General Public License for
 * more details.
 *
 * You should have received a copy of the GNU General Public License along
 * with this program.  If not, see <http://www.gnu.org/licenses/>.
 */

//! A tree of entities and brushes, with a selection

use log::debug;

use crate::brush::Brush;
use crate::planes::PlaneSet;
use crate::settings::CsgSettings;

/// Index of a node in a `Scene`. Stays valid until the node is removed, and is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Root,
    Entity { classname: String },
    Brush(Brush),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    layers: Vec<u32>,
    visible: bool,
}

impl Node {
    fn new(kind: NodeKind, parent: Option<NodeId>) -> Node {
        Node {
            kind,
            parent,
            children: Vec::new(),
            layers: vec![0],
            visible: true,
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn layers(&self) -> &[u32] {
        &self.layers
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// The entity class, for entity nodes.
    pub fn classname(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Entity { classname } => Some(classname),
            _ => None,
        }
    }

    pub fn brush(&self) -> Option<&Brush> {
        match &self.kind {
            NodeKind::Brush(brush) => Some(brush),
            _ => None,
        }
    }
}

/// Everything in a map being edited.
/// Brushes in the scene share one `PlaneSet`.
#[derive(Debug, Clone)]
pub struct Scene {
    nodes: Vec<Option<Node>>,
    selection: Vec<NodeId>,
    pub(crate) planes: PlaneSet,
    pub(crate) settings: CsgSettings,
}

impl Scene {
    pub fn new(settings: CsgSettings) -> Scene {
        Scene {
            nodes: vec![Some(Node::new(NodeKind::Root, None))],
            selection: Vec::new(),
            planes: PlaneSet::new(),
            settings,
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn settings(&self) -> &CsgSettings {
        &self.settings
    }

    pub fn planes(&self) -> &PlaneSet {
        &self.planes
    }

    /// Planes for building brushes to add to this scene.
    pub fn planes_mut(&mut self) -> &mut PlaneSet {
        &mut self.planes
    }

    pub fn add_entity(&mut self, parent: NodeId, classname: &str) -> Option<NodeId> {
        self.insert(
            parent,
            NodeKind::Entity {
                classname: classname.to_string(),
            },
        )
    }

    /// Add a brush under `parent`. The brush's planes must come from this scene's `PlaneSet`.
    pub fn add_brush(&mut self, parent: NodeId, mut brush: Brush) -> Option<NodeId> {
        brush.ensure_evaluated(&self.planes);
        self.insert(parent, NodeKind::Brush(brush))
    }

    fn insert(&mut self, parent: NodeId, kind: NodeKind) -> Option<NodeId> {
        if self.node(parent).is_none() {
            return None;
        }

        let id = NodeId(self.nodes.len());
        self.nodes.push(Some(Node::new(kind, Some(parent))));
        if let Some(parent) = self.node_mut(parent) {
            parent.children.push(id);
        }

        Some(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0).and_then(|n| n.as_ref())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0).and_then(|n| n.as_mut())
    }

    pub fn brush(&self, id: NodeId) -> Option<&Brush> {
        self.node(id).and_then(|n| n.brush())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn set_layers(&mut self, id: NodeId, layers: &[u32]) {
        if let Some(node) = self.node_mut(id) {
            node.layers = layers.to_vec();
        }
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(node) = self.node_mut(id) {
            node.visible = visible;
        }
    }

    /// Whether a node and everything above it is visible. Hiding a node hides its subtree.
    pub fn is_effectively_visible(&self, id: NodeId) -> bool {
        let mut next = Some(id);
        while let Some(id) = next {
            match self.node(id) {
                Some(node) if node.visible => next = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Remove a node and everything under it. The root can't be removed.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root() || self.node(id).is_none() {
            return false;
        }

        if let Some(parent) = self.parent(id).and_then(|p| self.node_mut(p)) {
            parent.children.retain(|c| *c != id);
        }

        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(node) = self.nodes.get_mut(next.0).and_then(|n| n.take()) {
                pending.extend(node.children);
            }
            self.selection.retain(|s| *s != next);
        }

        debug!("Removed node {}", id.0);
        true
    }

    /// All brushes, in the order they were added.
    pub fn brushes(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.as_ref().map_or(false, |n| n.brush().is_some()))
            .map(|(i, _)| NodeId(i))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn select(&mut self, id: NodeId) {
        if self.node(id).is_some() && !self.is_selected(id) {
            self.selection.push(id);
        }
    }

    pub fn deselect(&mut self, id: NodeId) {
        self.selection.retain(|s| *s != id);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selection.contains(&id)
    }

    /// Everything selected, in the order it was selected.
    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    /// Selected brushes, in the order they were selected.
    pub fn selected_brushes(&self) -> Vec<NodeId> {
        self.selection
            .iter()
            .copied()
            .filter(|id| self.brush(*id).is_some())
            .collect()
    }

    /// Put `brush` where `replaced` is, with the same parent and layers.
    pub(crate) fn insert_beside(&mut self, replaced: NodeId, brush: Brush) -> Option<NodeId> {
        let parent = self.parent(replaced)?;
        let layers = self.node(replaced)?.layers.clone();

        let id = self.add_brush(parent, brush)?;
        self.set_layers(id, &layers);
        Some(id)
    }
}

impl Default for Scene {
    fn default() -> Scene {
        Scene::new(CsgSettings::default())
    }
}
