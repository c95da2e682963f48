//! Scene layout and node bindings
//!
//! The scene is described by a JSON document of named sprite nodes in a
//! 1080x1920 design space (origin at the centre, y up). The game needs a
//! handful of them by name; a layout missing any of these is rejected before
//! the frame loop starts.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::ROD_COUNT;
use crate::sim::ReactorState;

/// Layout bundled with the game
pub const DEFAULT_LAYOUT: &str = include_str!("../assets/scene.json");

pub const KNOB_NODE: &str = "knobNode";
pub const ROD_NODES: [&str; ROD_COUNT] = ["rod1", "rod2", "rod3"];
pub const NEEDLE_NODE: &str = "needle";

/// Scene setup failures
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("missing scene node: {0}")]
    MissingNode(String),

    #[error("invalid scene layout: {0}")]
    Layout(#[from] serde_json::Error),
}

/// Sprite outline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeShape {
    #[default]
    Rect,
    /// Ellipse inscribed in the node size (drawn with radius `size.x / 2`)
    Circle,
}

fn default_anchor() -> Vec2 {
    Vec2::splat(0.5)
}

/// A sprite in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteNode {
    pub name: String,
    #[serde(default)]
    pub shape: NodeShape,
    pub position: Vec2,
    pub size: Vec2,
    /// Rotation pivot in unit coordinates of the sprite
    #[serde(default = "default_anchor")]
    pub anchor: Vec2,
    /// Rotation around the node centre (radians, CCW)
    #[serde(default)]
    pub z_rotation: f32,
    pub color: [f32; 4],
}

/// All nodes of the scene, in draw order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneLayout {
    pub size: Vec2,
    pub background: [f32; 4],
    pub nodes: Vec<SpriteNode>,
}

impl SceneLayout {
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Bundled layout
    pub fn bundled() -> Result<Self, SceneError> {
        Self::from_json(DEFAULT_LAYOUT)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.nodes.iter().position(|n| n.name == name)
    }

    fn require(&self, name: &str) -> Result<usize, SceneError> {
        self.index_of(name)
            .ok_or_else(|| SceneError::MissingNode(name.to_string()))
    }
}

/// Indices of the nodes the game drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneNodes {
    pub knob: usize,
    pub rods: [usize; ROD_COUNT],
    pub needle: usize,
}

impl SceneNodes {
    /// Look up every required node
    pub fn resolve(layout: &SceneLayout) -> Result<Self, SceneError> {
        let knob = layout.require(KNOB_NODE)?;
        let rods = [
            layout.require(ROD_NODES[0])?,
            layout.require(ROD_NODES[1])?,
            layout.require(ROD_NODES[2])?,
        ];
        let needle = layout.require(NEEDLE_NODE)?;
        Ok(Self { knob, rods, needle })
    }

    pub fn knob_center(&self, layout: &SceneLayout) -> Vec2 {
        layout.nodes[self.knob].position
    }

    /// Write the simulation state into the sprite properties
    pub fn apply(&self, layout: &mut SceneLayout, state: &ReactorState) {
        layout.nodes[self.knob].z_rotation = state.knob.rotation;
        for (node, rod) in self.rods.iter().zip(state.rods.rods.iter()) {
            layout.nodes[*node].position.y = rod.scene_y();
        }
        layout.nodes[self.needle].z_rotation = state.needle_angle;
    }
}

/// Maps view pixels to scene coordinates (aspect fill, centred)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewMapping {
    /// View size in pixels
    pub view: Vec2,
    /// Scene size in design units
    pub scene: Vec2,
}

impl ViewMapping {
    pub fn new(view_width: f32, view_height: f32, scene: Vec2) -> Self {
        Self {
            view: Vec2::new(view_width, view_height),
            scene,
        }
    }

    /// Pixels per design unit. Aspect fill: the larger ratio wins and the
    /// other axis is cropped.
    pub fn scale(&self) -> f32 {
        (self.view.x / self.scene.x).max(self.view.y / self.scene.y)
    }

    /// View pixel (y down) to scene point (y up)
    pub fn view_to_scene(&self, x: f32, y: f32) -> Vec2 {
        let scale = self.scale();
        Vec2::new(
            (x - self.view.x / 2.0) / scale,
            (self.view.y / 2.0 - y) / scale,
        )
    }

    /// Scene point to normalized device coordinates
    pub fn scene_to_ndc(&self, p: Vec2) -> Vec2 {
        let scale = self.scale();
        Vec2::new(
            p.x * scale / (self.view.x / 2.0),
            p.y * scale / (self.view.y / 2.0),
        )
    }
}
