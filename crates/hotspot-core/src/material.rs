//! Material switching across the loaded mesh collection
//!
//! The switcher owns the two pre-built materials and the current selection.
//! Every assignment goes through [`MaterialSwitcher::apply`] or
//! [`MaterialSwitcher::toggle`], which always touch every mesh, so the
//! collection can never hold a mix of materials.

use std::fmt;

/// The two mutually exclusive appearances of the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaterialKind {
    #[default]
    Metallic,
    Wireframe,
}

impl MaterialKind {
    /// The other variant
    pub fn toggled(self) -> Self {
        match self {
            MaterialKind::Metallic => MaterialKind::Wireframe,
            MaterialKind::Wireframe => MaterialKind::Metallic,
        }
    }
}

impl fmt::Display for MaterialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaterialKind::Metallic => write!(f, "metallic"),
            MaterialKind::Wireframe => write!(f, "wireframe"),
        }
    }
}

/// Holds both materials and which one is current.
///
/// `M` is whatever the engine uses to reference a material (an asset handle
/// in the viewer, plain values in tests).
#[derive(Debug, Clone)]
pub struct MaterialSwitcher<M> {
    metallic: M,
    wireframe: M,
    current: MaterialKind,
}

impl<M> MaterialSwitcher<M> {
    /// New switcher with the metallic material current
    pub fn new(metallic: M, wireframe: M) -> Self {
        Self {
            metallic,
            wireframe,
            current: MaterialKind::Metallic,
        }
    }

    pub fn current(&self) -> MaterialKind {
        self.current
    }

    pub fn material(&self, kind: MaterialKind) -> &M {
        match kind {
            MaterialKind::Metallic => &self.metallic,
            MaterialKind::Wireframe => &self.wireframe,
        }
    }

    pub fn current_material(&self) -> &M {
        self.material(self.current)
    }

    /// Assign the current material to every mesh
    pub fn apply<T>(&self, meshes: &mut [T], mut assign: impl FnMut(&mut T, &M, MaterialKind)) {
        let material = self.current_material();
        for mesh in meshes.iter_mut() {
            assign(mesh, material, self.current);
        }
    }

    /// Flip the current material and reassign it to every mesh.
    ///
    /// With an empty collection this is a no-op and returns `None`.
    pub fn toggle<T>(
        &mut self,
        meshes: &mut [T],
        assign: impl FnMut(&mut T, &M, MaterialKind),
    ) -> Option<MaterialKind> {
        if meshes.is_empty() {
            tracing::debug!("Material toggle ignored, no meshes loaded");
            return None;
        }

        self.current = self.current.toggled();
        self.apply(meshes, assign);
        tracing::debug!(material = %self.current, meshes = meshes.len(), "Material switched");
        Some(self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct FakeMesh {
        material: Option<&'static str>,
        assignments: usize,
    }

    fn assign(mesh: &mut FakeMesh, material: &&'static str, _kind: MaterialKind) {
        mesh.material = Some(*material);
        mesh.assignments += 1;
    }

    fn loaded(count: usize) -> (MaterialSwitcher<&'static str>, Vec<FakeMesh>) {
        let switcher = MaterialSwitcher::new("metallic", "wireframe");
        let mut meshes = vec![FakeMesh::default(); count];
        switcher.apply(&mut meshes, assign);
        (switcher, meshes)
    }

    fn assert_uniform(switcher: &MaterialSwitcher<&'static str>, meshes: &[FakeMesh]) {
        for mesh in meshes {
            assert_eq!(mesh.material, Some(*switcher.current_material()));
        }
    }

    #[test]
    fn test_apply_sets_metallic_everywhere() {
        let (switcher, meshes) = loaded(4);
        assert_eq!(switcher.current(), MaterialKind::Metallic);
        assert_uniform(&switcher, &meshes);
    }

    #[test]
    fn test_toggle_keeps_collection_uniform() {
        let (mut switcher, mut meshes) = loaded(3);
        // Simulate a per-mesh override that toggling must replace
        meshes[1].material = Some("override");

        assert_eq!(
            switcher.toggle(&mut meshes, assign),
            Some(MaterialKind::Wireframe)
        );
        assert_uniform(&switcher, &meshes);
        assert_eq!(*switcher.current_material(), "wireframe");
    }

    #[test]
    fn test_even_toggles_restore_metallic() {
        let (mut switcher, mut meshes) = loaded(5);
        for _ in 0..6 {
            switcher.toggle(&mut meshes, assign);
        }
        assert_eq!(switcher.current(), MaterialKind::Metallic);
        assert!(meshes.iter().all(|m| m.material == Some("metallic")));
        // One assignment at load, six toggles
        assert!(meshes.iter().all(|m| m.assignments == 7));
    }

    #[test]
    fn test_toggle_empty_collection_is_noop() {
        let mut switcher = MaterialSwitcher::new("metallic", "wireframe");
        let mut meshes: Vec<FakeMesh> = Vec::new();

        assert_eq!(switcher.toggle(&mut meshes, assign), None);
        assert_eq!(switcher.current(), MaterialKind::Metallic);
    }

    #[test]
    fn test_assign_receives_kind() {
        let (mut switcher, mut meshes) = loaded(2);
        let mut kinds = Vec::new();
        switcher.toggle(&mut meshes, |_, _, kind| kinds.push(kind));
        assert_eq!(kinds, vec![MaterialKind::Wireframe; 2]);
    }
}
