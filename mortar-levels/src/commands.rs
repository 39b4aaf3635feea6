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

//! CSG commands acting on the selection in a scene

use log::{info, warn};

use crate::brush::Brush;
use crate::csg::{hollow, merge, subtract_brush, Subtraction};
use crate::error::CsgError;
use crate::scene::{NodeId, Scene};

/// How many brushes a subtraction replaced, and with how many.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubtractReport {
    pub before: usize,
    pub after: usize,
}

impl Scene {
    /// Take every selected brush away from every visible, unselected brush.
    pub fn subtract_selected_from_unselected(&mut self) -> Result<SubtractReport, CsgError> {
        let selected = self.selected_brushes();
        if selected.is_empty() {
            warn!("CSG Subtract: No brushes selected.");
            return Err(CsgError::NoBrushesSelected);
        }

        if self.settings.warn_on_subtract {
            warn!("CSG Subtract can leave behind lots of small brushes, check the result.");
            // Only remind once
            self.settings.warn_on_subtract = false;
        }

        info!("CSG Subtract: Subtracting {} brushes.", selected.len());

        let targets: Vec<NodeId> = self
            .brushes()
            .into_iter()
            .filter(|id| !self.is_selected(*id))
            .filter(|id| self.is_effectively_visible(*id))
            .collect();

        let mut report = SubtractReport::default();
        for target in targets {
            let fragments = match self.subtract_all(target, &selected) {
                Some(fragments) => fragments,
                None => continue,
            };

            report.before += 1;
            report.after += fragments.len();

            for fragment in fragments {
                self.insert_beside(target, fragment);
            }
            self.remove(target);
        }

        info!(
            "CSG Subtract: Result: {} fragments from {} brushes.",
            report.after, report.before
        );

        Ok(report)
    }

    /// What's left of `target` after taking all of `subtractors` away, in turn.
    /// Returns `None` if nothing changed.
    fn subtract_all(&self, target: NodeId, subtractors: &[NodeId]) -> Option<Vec<Brush>> {
        let original = self.brush(target)?;

        // Brushes, and whether they are still the unmodified original
        let mut pieces = vec![(original.clone(), true)];

        for subtractor in subtractors.iter().filter_map(|id| self.brush(*id)) {
            let mut next = Vec::with_capacity(pieces.len());
            for (piece, untouched) in pieces {
                match subtract_brush(&piece, subtractor, &self.planes) {
                    Subtraction::Disjoint => next.push((piece, untouched)),
                    Subtraction::Consumed => {}
                    Subtraction::Fragments(fragments) => {
                        next.extend(fragments.into_iter().map(|f| (f, false)))
                    }
                }
            }
            pieces = next;
        }

        if pieces.len() == 1 && pieces[0].1 {
            return None;
        }

        Some(pieces.into_iter().map(|(piece, _)| piece).collect())
    }

    /// Merge the selected brushes into one, for each parent they have.
    /// The new brush is put where the last selected brush of its group was, and selected.
    pub fn merge_selected(&mut self) -> Result<Vec<NodeId>, CsgError> {
        let selected = self.selected_brushes();
        if selected.len() < 2 {
            warn!("CSG Merge: At least two brushes have to be selected.");
            return Err(CsgError::NotEnoughBrushes);
        }

        // Group by parent, keeping selection order
        let mut groups: Vec<(Option<NodeId>, Vec<NodeId>)> = Vec::new();
        for id in selected {
            let parent = self.parent(id);
            match groups.iter_mut().find(|(p, _)| *p == parent) {
                Some((_, group)) => group.push(id),
                None => groups.push((parent, vec![id])),
            }
        }

        if groups.iter().all(|(_, group)| group.len() < 2) {
            warn!("CSG Merge: At least two brushes with the same parent have to be selected.");
            return Err(CsgError::NotEnoughBrushes);
        }

        // Work out every result before touching the scene
        let mut results = Vec::new();
        for (_, group) in groups.into_iter().filter(|(_, g)| g.len() >= 2) {
            let result = {
                let brushes: Vec<&Brush> = group.iter().filter_map(|id| self.brush(*id)).collect();
                merge(&brushes, &self.planes, true)
            };

            match result {
                Some(brush) => results.push((group, brush)),
                None => {
                    warn!("CSG Merge: Failed - result would not be convex.");
                    return Err(CsgError::NotConvex);
                }
            }
        }

        let mut merged = Vec::new();
        for (group, brush) in results {
            let ultimate = group[group.len() - 1];
            if let Some(id) = self.insert_beside(ultimate, brush) {
                for old in group {
                    self.remove(old);
                }
                self.select(id);
                merged.push(id);
            }
        }

        info!("CSG Merge: Succeeded.");
        Ok(merged)
    }

    /// Replace each selected brush with walls the thickness of the grid, filling its inside.
    pub fn hollow_selected(&mut self) -> Result<Vec<NodeId>, CsgError> {
        self.hollow_selected_brushes(false)
    }

    /// Replace each selected brush with walls the thickness of the grid, surrounding its outside.
    pub fn make_room_for_selected(&mut self) -> Result<Vec<NodeId>, CsgError> {
        self.hollow_selected_brushes(true)
    }

    fn hollow_selected_brushes(&mut self, make_room: bool) -> Result<Vec<NodeId>, CsgError> {
        let selected = self.selected_brushes();
        if selected.is_empty() {
            warn!("CSG Hollow: No brushes selected.");
            return Err(CsgError::NoBrushesSelected);
        }

        let offset = self.settings.grid_size;
        let mut walls = Vec::new();

        for id in selected {
            let source = match self.brush(id) {
                Some(brush) => brush.clone(),
                None => continue,
            };

            for wall in hollow(&source, &mut self.planes, offset, make_room) {
                if let Some(wall_id) = self.insert_beside(id, wall) {
                    walls.push(wall_id);
                }
            }
            self.remove(id);
        }

        info!("CSG Hollow: Made {} walls.", walls.len());
        Ok(walls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mortar_types::Vector3;

    fn add_cuboid(scene: &mut Scene, parent: NodeId, mins: [f64; 3], maxs: [f64; 3]) -> NodeId {
        let brush = Brush::cuboid(
            scene.planes_mut(),
            Vector3::new(mins[0], mins[1], mins[2]),
            Vector3::new(maxs[0], maxs[1], maxs[2]),
            None,
        );
        scene.add_brush(parent, brush).unwrap()
    }

    #[test]
    fn nothing_selected() {
        let mut scene = Scene::default();
        assert_eq!(
            scene.subtract_selected_from_unselected(),
            Err(CsgError::NoBrushesSelected)
        );
        assert_eq!(scene.hollow_selected(), Err(CsgError::NoBrushesSelected));
        assert_eq!(scene.merge_selected(), Err(CsgError::NotEnoughBrushes));
    }

    #[test]
    fn subtract_replaces_touched_brushes() {
        let mut scene = Scene::default();
        let world = scene.add_entity(scene.root(), "worldspawn").unwrap();
        let target = add_cuboid(&mut scene, world, [0.0; 3], [64.0; 3]);
        let far = add_cuboid(&mut scene, world, [256.0; 3], [320.0; 3]);
        let cutter = add_cuboid(&mut scene, world, [32.0, -16.0, -16.0], [96.0, 80.0, 80.0]);
        scene.set_layers(target, &[2]);
        scene.select(cutter);

        let report = scene.subtract_selected_from_unselected().unwrap();
        assert_eq!(report, SubtractReport { before: 1, after: 1 });

        assert!(scene.node(target).is_none());
        assert!(scene.node(far).is_some());
        assert!(scene.node(cutter).is_some());

        let fragment = *scene.brushes().last().unwrap();
        assert_eq!(scene.parent(fragment), Some(world));
        assert_eq!(scene.node(fragment).unwrap().layers(), &[2]);
        assert_eq!(
            scene.brush(fragment).unwrap().bounds().maxs,
            Vector3::new(32.0, 64.0, 64.0)
        );
    }

    #[test]
    fn subtract_reminder_is_given_once() {
        let mut scene = Scene::default();
        let world = scene.add_entity(scene.root(), "worldspawn").unwrap();
        add_cuboid(&mut scene, world, [0.0; 3], [64.0; 3]);
        let cutter = add_cuboid(&mut scene, world, [32.0; 3], [96.0; 3]);
        scene.select(cutter);

        assert!(scene.settings().warn_on_subtract);
        scene.subtract_selected_from_unselected().unwrap();
        assert!(!scene.settings().warn_on_subtract);
    }

    #[test]
    fn hidden_brushes_are_not_subtracted_from() {
        let mut scene = Scene::default();
        let world = scene.add_entity(scene.root(), "worldspawn").unwrap();
        let target = add_cuboid(&mut scene, world, [0.0; 3], [64.0; 3]);
        let cutter = add_cuboid(&mut scene, world, [32.0; 3], [96.0; 3]);
        scene.set_visible(target, false);
        scene.select(cutter);

        let report = scene.subtract_selected_from_unselected().unwrap();
        assert_eq!(report, SubtractReport::default());
        assert!(scene.node(target).is_some());
    }

    #[test]
    fn merge_takes_the_last_selected_place() {
        let mut scene = Scene::default();
        let world = scene.add_entity(scene.root(), "worldspawn").unwrap();
        let a = add_cuboid(&mut scene, world, [0.0; 3], [64.0; 3]);
        let b = add_cuboid(&mut scene, world, [64.0, 0.0, 0.0], [128.0, 64.0, 64.0]);
        scene.set_layers(b, &[1, 3]);
        scene.select(a);
        scene.select(b);

        let merged = scene.merge_selected().unwrap();
        assert_eq!(merged.len(), 1);

        let id = merged[0];
        assert!(scene.node(a).is_none());
        assert!(scene.node(b).is_none());
        assert!(scene.is_selected(id));
        assert_eq!(scene.node(id).unwrap().layers(), &[1, 3]);
        assert_eq!(
            scene.brush(id).unwrap().bounds().maxs,
            Vector3::new(128.0, 64.0, 64.0)
        );
    }

    #[test]
    fn failed_merge_leaves_the_scene_alone() {
        let mut scene = Scene::default();
        let world = scene.add_entity(scene.root(), "worldspawn").unwrap();
        let a = add_cuboid(&mut scene, world, [0.0; 3], [64.0; 3]);
        let b = add_cuboid(&mut scene, world, [32.0, 32.0, 0.0], [96.0, 96.0, 64.0]);
        scene.select(a);
        scene.select(b);

        assert_eq!(scene.merge_selected(), Err(CsgError::NotConvex));
        assert_eq!(scene.brushes(), vec![a, b]);
    }

    #[test]
    fn merge_needs_a_shared_parent() {
        let mut scene = Scene::default();
        let world = scene.add_entity(scene.root(), "worldspawn").unwrap();
        let door = scene.add_entity(scene.root(), "func_door").unwrap();
        let a = add_cuboid(&mut scene, world, [0.0; 3], [64.0; 3]);
        let b = add_cuboid(&mut scene, door, [64.0, 0.0, 0.0], [128.0, 64.0, 64.0]);
        scene.select(a);
        scene.select(b);

        assert_eq!(scene.merge_selected(), Err(CsgError::NotEnoughBrushes));
    }

    #[test]
    fn hollow_and_make_room() {
        let mut scene = Scene::default();
        let world = scene.add_entity(scene.root(), "worldspawn").unwrap();
        let a = add_cuboid(&mut scene, world, [0.0; 3], [64.0; 3]);
        scene.select(a);

        let walls = scene.hollow_selected().unwrap();
        assert_eq!(walls.len(), 6);
        assert!(scene.node(a).is_none());
        assert!(walls.iter().all(|w| scene.parent(*w) == Some(world)));
        assert_eq!(
            scene.brush(walls[0]).unwrap().bounds().mins,
            Vector3::new(56.0, 0.0, 0.0)
        );

        let b = add_cuboid(&mut scene, world, [0.0; 3], [64.0; 3]);
        scene.select(b);
        let rooms = scene.make_room_for_selected().unwrap();
        assert_eq!(rooms.len(), 6);
        assert_eq!(
            scene.brush(rooms[0]).unwrap().bounds().mins,
            Vector3::new(64.0, 0.0, 0.0)
        );
    }
}
