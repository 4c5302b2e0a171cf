//! Bone hierarchy.
//!
//! Bones own their children by value; parents are looked up by name through
//! the skeleton, never stored in the bone.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{AnimationError, Result};
use crate::value::Vec3;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
    /// Rest offset from the parent.
    #[serde(default = "Vec3::zeros")]
    pub position: Vec3,
    /// Rest rotation, Euler degrees.
    #[serde(default = "Vec3::zeros")]
    pub rotation: Vec3,
    /// Uniform display scale for the host's renderer. Propagation never
    /// reads it; emitted scales come from animation frames alone.
    #[serde(default = "unit_scale")]
    pub scale: f32,
    #[serde(default)]
    pub children: Vec<Bone>,
}

fn unit_scale() -> f32 {
    1.0
}

impl Bone {
    pub fn new(name: impl Into<String>, position: Vec3) -> Self {
        Self {
            name: name.into(),
            position,
            rotation: Vec3::zeros(),
            scale: 1.0,
            children: Vec::new(),
        }
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_child(mut self, child: Bone) -> Self {
        self.children.push(child);
        self
    }
}

/// Validated bone forest with name lookups.
#[derive(Clone, Debug)]
pub struct Skeleton {
    roots: Vec<Bone>,
    parents: HashMap<String, Option<String>>,
}

impl Skeleton {
    /// Fails if two bones share a name.
    pub fn new(roots: Vec<Bone>) -> Result<Self> {
        let mut parents = HashMap::new();
        let mut stack: Vec<(&Bone, Option<&str>)> =
            roots.iter().rev().map(|bone| (bone, None)).collect();
        while let Some((bone, parent)) = stack.pop() {
            if parents
                .insert(bone.name.clone(), parent.map(str::to_string))
                .is_some()
            {
                return Err(AnimationError::DuplicateBone {
                    name: bone.name.clone(),
                });
            }
            stack.extend(
                bone.children
                    .iter()
                    .rev()
                    .map(|child| (child, Some(bone.name.as_str()))),
            );
        }
        Ok(Self { roots, parents })
    }

    pub fn roots(&self) -> &[Bone] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parents.contains_key(name)
    }

    pub fn parent(&self, name: &str) -> Option<&str> {
        self.parents.get(name)?.as_deref()
    }

    pub fn bone(&self, name: &str) -> Option<&Bone> {
        self.iter().find(|bone| bone.name == name)
    }

    /// Depth-first, parents before children.
    pub fn iter(&self) -> impl Iterator<Item = &Bone> + '_ {
        let mut stack: Vec<&Bone> = self.roots.iter().rev().collect();
        std::iter::from_fn(move || {
            let bone = stack.pop()?;
            stack.extend(bone.children.iter().rev());
            Some(bone)
        })
    }
}
