use super::LocatedPoint;
use crate::domain::mesh::MeshId;
use crate::error::{Error, Result};

#[cfg(feature = "json_export")]
use json::{object, JsonValue};

/// The located points of every node of one embedded Mesh
#[derive(Clone, Debug, PartialEq)]
pub struct Correspondence {
    mesh: MeshId,
    points: Vec<LocatedPoint>,
    outside: Vec<usize>,
}

impl Correspondence {
    pub(crate) fn new(mesh: MeshId, points: Vec<LocatedPoint>) -> Self {
        let outside = points
            .iter()
            .enumerate()
            .filter(|(_, lp)| !lp.is_found())
            .map(|(node, _)| node)
            .collect();

        Self {
            mesh,
            points,
            outside,
        }
    }

    pub fn mesh(&self) -> MeshId {
        self.mesh
    }

    pub fn number_of_nodes(&self) -> usize {
        self.points.len()
    }

    pub fn located_point(&self, node: usize) -> Result<&LocatedPoint> {
        self.points.get(node).ok_or(Error::NodeOutOfRange {
            node,
            number_of_nodes: self.points.len(),
        })
    }

    /// One entry per embedded node, in node order
    pub fn located_points(&self) -> &[LocatedPoint] {
        &self.points
    }

    /// Nodes with no containing element (ascending)
    pub fn outside_nodes(&self) -> &[usize] {
        &self.outside
    }

    /// Produce a Json Object that describes this Correspondence
    #[cfg(feature = "json_export")]
    pub fn to_json(&self) -> JsonValue {
        let nodes: Vec<JsonValue> = self
            .points
            .iter()
            .enumerate()
            .map(|(node, lp)| {
                object! {
                    "node": node,
                    "element": lp.element_index,
                    "local": lp.local_coordinates.iter().cloned().collect::<Vec<f64>>(),
                }
            })
            .collect();

        object! {
            "mesh": self.mesh.to_string(),
            "outside": self.outside.clone(),
            "nodes": nodes,
        }
    }
}
