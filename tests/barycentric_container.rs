use approx::{assert_abs_diff_eq, assert_relative_eq};
use fem_barycentric::{
    BarycentricContainer, Domain, Error, Hexahedron, LocatedPoint, Mesh, Quad, Segment, Tetrahedron,
    Triangle,
};
use nalgebra::{DMatrix, DVector};

const ACCURACY: f64 = 1e-10;

//  6:(-5, 5)     7:(0, 5)      8:(5, 5)
//      +-------------+-------------+
//      |      2      |      3      |
//  3:(-5, 0)     4:(0, 0)      5:(5, 0)
//      +-------------+-------------+
//      |      0      |      1      |
//      +-------------+-------------+
//  0:(-5, -5)    1:(0, -5)     2:(5, -5)
fn container_mesh() -> Mesh {
    Mesh::from_points(&[
        [-5.0, -5.0],
        [0.0, -5.0],
        [5.0, -5.0],
        [-5.0, 0.0],
        [0.0, 0.0],
        [5.0, 0.0],
        [-5.0, 5.0],
        [0.0, 5.0],
        [5.0, 5.0],
    ])
}

const CONTAINER_QUADS: [[usize; 4]; 4] = [[0, 1, 4, 3], [1, 2, 5, 4], [3, 4, 7, 6], [4, 5, 8, 7]];

// a 3 x 3 node grid over [-2.5, 2.5]^2, entirely inside the container
fn inner_mesh() -> Mesh {
    Mesh::from_points(&[
        [-2.5, -2.5],
        [0.0, -2.5],
        [2.5, -2.5],
        [-2.5, 0.0],
        [0.0, 0.0],
        [2.5, 0.0],
        [-2.5, 2.5],
        [0.0, 2.5],
        [2.5, 2.5],
    ])
}

// a 3 x 3 node grid over [-7.5, -2.5] x [2.5, 7.5], overlapping the top left container corner
fn corner_mesh() -> Mesh {
    Mesh::from_points(&[
        [-7.5, 2.5],
        [-5.0, 2.5],
        [-2.5, 2.5],
        [-7.5, 5.0],
        [-5.0, 5.0],
        [-2.5, 5.0],
        [-7.5, 7.5],
        [-5.0, 7.5],
        [-2.5, 7.5],
    ])
}

#[test]
fn container_nodes_round_trip() {
    let mesh = container_mesh();
    let domain = Domain::<Quad>::new(&mesh, "quads", &CONTAINER_QUADS).unwrap();
    let container = BarycentricContainer::new(&domain).unwrap();

    for node in 0..mesh.number_of_nodes() {
        let p = mesh.position(node);
        let lp = container.locate(&p).unwrap();
        let element = domain.element(lp.element_index.unwrap());
        assert_relative_eq!(
            element.world_coordinates(&lp.local_coordinates),
            p,
            epsilon = ACCURACY
        );
    }
}

#[test]
fn gauss_nodes_and_centers_are_found_in_their_element() {
    let mesh = container_mesh();
    let domain = Domain::<Quad>::new(&mesh, "quads", &CONTAINER_QUADS).unwrap();
    let container = BarycentricContainer::new(&domain).unwrap();

    for element in domain.elements() {
        for gn in element.gauss_nodes() {
            let lp = container.locate(&element.world_coordinates(&gn.position)).unwrap();
            assert_eq!(lp.element_index, Some(element.id()));
            assert_relative_eq!(lp.local_coordinates, gn.position, epsilon = ACCURACY);
        }

        let lp = container.locate(&element.center()).unwrap();
        assert_eq!(lp.element_index, Some(element.id()));
        assert_relative_eq!(
            element.world_coordinates(&lp.local_coordinates),
            element.center(),
            epsilon = ACCURACY
        );
    }
}

#[test]
fn embedded_mesh_inside() {
    let mesh = container_mesh();
    let domain = Domain::<Quad>::new(&mesh, "quads", &CONTAINER_QUADS).unwrap();
    let mut container = BarycentricContainer::new(&domain).unwrap();

    let embedded = inner_mesh();
    // the embedded mesh has its own elements; only its nodes matter to the container
    let embedded_domain = Domain::<Quad>::new(&embedded, "quads", &CONTAINER_QUADS).unwrap();
    assert_eq!(embedded_domain.number_of_elements(), 4);

    assert!(container.add_embedded_mesh(&embedded).unwrap().is_empty());

    for node in 0..embedded.number_of_nodes() {
        let lp = container.locate_node(&embedded, node).unwrap();
        let element = domain.element(lp.element_index.unwrap());
        assert_relative_eq!(
            element.world_coordinates(&lp.local_coordinates),
            embedded.position(node),
            epsilon = ACCURACY
        );
    }

    // interpolating the container's positions reproduces the embedded positions
    let interpolated = container.interpolate_field(&embedded, mesh.positions()).unwrap();
    assert_eq!(interpolated.shape(), (9, 2));
    assert_abs_diff_eq!(interpolated, embedded.positions().clone(), epsilon = ACCURACY);
}

#[test]
fn embedded_mesh_partially_outside() {
    let mesh = container_mesh();
    let domain = Domain::<Quad>::new(&mesh, "quads", &CONTAINER_QUADS).unwrap();
    let mut container = BarycentricContainer::new(&domain).unwrap();

    let embedded = corner_mesh();
    let outside = container.add_embedded_mesh(&embedded).unwrap();
    assert_eq!(outside, vec![0, 3, 6, 7, 8]);

    // nodes on the container boundary are inside
    for node in [1, 2, 4, 5] {
        assert_eq!(container.locate_node(&embedded, node).unwrap().element_index, Some(2));
    }
    assert_eq!(
        container.locate_node(&embedded, 6).unwrap(),
        &LocatedPoint::outside()
    );

    // a linear field is reproduced on the inside nodes, and zero on the outside ones
    let values = DMatrix::from_fn(9, 1, |r, _| {
        1.0 + mesh.positions()[(r, 0)] - 2.0 * mesh.positions()[(r, 1)]
    });
    let interpolated = container.interpolate_field(&embedded, &values).unwrap();
    for node in 0..9 {
        let expected = if outside.contains(&node) {
            0.0
        } else {
            let p = embedded.position(node);
            1.0 + p[0] - 2.0 * p[1]
        };
        assert_abs_diff_eq!(interpolated[(node, 0)], expected, epsilon = ACCURACY);
    }
}

#[test]
fn registration_is_idempotent() {
    let mesh = container_mesh();
    let domain = Domain::<Quad>::new(&mesh, "quads", &CONTAINER_QUADS).unwrap();
    let mut container = BarycentricContainer::new(&domain).unwrap();

    let embedded = corner_mesh();
    let first_outside = container.add_embedded_mesh(&embedded).unwrap();
    let first = container.correspondence(&embedded).unwrap().clone();

    let second_outside = container.add_embedded_mesh(&embedded).unwrap();
    assert_eq!(first_outside, second_outside);
    assert_eq!(&first, container.correspondence(&embedded).unwrap());
    assert_eq!(container.number_of_embedded_meshes(), 1);

    // the same positions under another identity are a separate registration
    let copy = embedded.clone();
    assert_eq!(container.add_embedded_mesh(&copy).unwrap(), first_outside);
    assert_eq!(container.number_of_embedded_meshes(), 2);
}

#[test]
fn misuse_is_reported() {
    let mesh = container_mesh();
    let domain = Domain::<Quad>::new(&mesh, "quads", &CONTAINER_QUADS).unwrap();
    let mut container = BarycentricContainer::new(&domain).unwrap();
    let embedded = inner_mesh();

    assert_eq!(
        container.interpolate_field(&embedded, mesh.positions()).unwrap_err(),
        Error::UnregisteredMesh { mesh: embedded.id() }
    );

    container.add_embedded_mesh(&embedded).unwrap();
    assert_eq!(
        container.interpolate_field(&embedded, &DMatrix::zeros(8, 2)).unwrap_err(),
        Error::DimensionMismatch {
            what: "field rows (container nodes)",
            expected: 9,
            found: 8
        }
    );

    let mut output = DMatrix::zeros(4, 2);
    assert!(matches!(
        container.interpolate_field_into(&embedded, mesh.positions(), &mut output),
        Err(Error::DimensionMismatch { expected: 9, found: 4, .. })
    ));

    let embedded_3d = Mesh::from_points(&[[0.0, 0.0, 0.0]]);
    assert!(matches!(
        container.add_embedded_mesh(&embedded_3d),
        Err(Error::DimensionMismatch { .. })
    ));
    assert!(!container.is_registered(&embedded_3d));
}

#[test]
fn locate_many_keeps_row_order() {
    let mesh = container_mesh();
    let domain = Domain::<Quad>::new(&mesh, "quads", &CONTAINER_QUADS).unwrap();
    let container = BarycentricContainer::new(&domain).unwrap();

    let points = DMatrix::from_row_slice(
        5,
        2,
        &[4.0, 4.0, -4.0, -4.0, 9.0, 0.0, 2.5, -2.5, -1.0, 3.0],
    );
    let located = container.locate_many(&points).unwrap();

    let elements: Vec<Option<usize>> = located.iter().map(|lp| lp.element_index).collect();
    assert_eq!(elements, vec![Some(3), Some(0), None, Some(1), Some(2)]);

    for (row, lp) in located.iter().enumerate() {
        let single = container.locate(&points.row(row).transpose()).unwrap();
        assert_eq!(&single, lp);
    }
}

#[test]
fn meshes_far_from_the_origin() {
    for offset in [1e6, 5e6, 1e7] {
        // two unit squares side by side, shifted by `offset` along both axes
        let mesh = Mesh::from_points(&[
            [offset, offset],
            [offset + 1.0, offset],
            [offset + 2.0, offset],
            [offset, offset + 1.0],
            [offset + 1.0, offset + 1.0],
            [offset + 2.0, offset + 1.0],
        ]);
        let domain = Domain::<Quad>::new(&mesh, "strip", &[[0, 1, 4, 3], [1, 2, 5, 4]]).unwrap();
        let mut container = BarycentricContainer::new(&domain).unwrap();

        let points: Vec<[f64; 2]> = (0..20)
            .flat_map(|i| {
                (0..10).map(move |j| {
                    [
                        offset + 0.05 + 0.1 * i as f64,
                        offset + 0.05 + 0.1 * j as f64,
                    ]
                })
            })
            .collect();

        for point in points.iter() {
            let p = DVector::from_row_slice(point);
            let lp = container.locate(&p).unwrap();
            let expected = if point[0] - offset < 1.0 { 0 } else { 1 };
            assert_eq!(lp.element_index, Some(expected), "{} at offset {}", p, offset);

            let element = domain.element(expected);
            assert_abs_diff_eq!(
                element.world_coordinates(&lp.local_coordinates),
                p,
                epsilon = 1e-6
            );
        }

        let embedded = Mesh::from_points(&points);
        assert!(container.add_embedded_mesh(&embedded).unwrap().is_empty());
    }
}

// (n + 1)^3 nodes over [0, n]^3, with the interior nodes displaced so the hexahedra are not
// parallelepipeds
fn distorted_hex_grid(n: usize) -> (Mesh, Vec<[usize; 8]>) {
    let idx = |i: usize, j: usize, k: usize| i + (n + 1) * (j + (n + 1) * k);

    let mut points = Vec::new();
    for k in 0..=n {
        for j in 0..=n {
            for i in 0..=n {
                let interior = [i, j, k].iter().all(|c| *c > 0 && *c < n);
                let shift = if interior { 0.15 } else { 0.0 };
                points.push([i as f64 + shift, j as f64 - shift, k as f64 + 0.5 * shift]);
            }
        }
    }

    let mut hexes = Vec::new();
    for k in 0..n {
        for j in 0..n {
            for i in 0..n {
                hexes.push([
                    idx(i, j, k),
                    idx(i + 1, j, k),
                    idx(i + 1, j + 1, k),
                    idx(i, j + 1, k),
                    idx(i, j, k + 1),
                    idx(i + 1, j, k + 1),
                    idx(i + 1, j + 1, k + 1),
                    idx(i, j + 1, k + 1),
                ]);
            }
        }
    }

    (Mesh::from_points(&points), hexes)
}

#[test]
fn distorted_hexahedra() {
    let (mesh, hexes) = distorted_hex_grid(3);
    let domain = Domain::<Hexahedron>::new(&mesh, "hexes", &hexes).unwrap();
    let mut container = BarycentricContainer::new(&domain).unwrap();

    for node in 0..mesh.number_of_nodes() {
        let p = mesh.position(node);
        let lp = container.locate(&p).unwrap();
        let element = domain.element(lp.element_index.unwrap());
        assert_relative_eq!(
            element.world_coordinates(&lp.local_coordinates),
            p,
            epsilon = ACCURACY
        );
    }

    for element in domain.elements() {
        for gn in element.gauss_nodes() {
            let lp = container.locate(&element.world_coordinates(&gn.position)).unwrap();
            assert_eq!(lp.element_index, Some(element.id()));
            assert_relative_eq!(lp.local_coordinates, gn.position, epsilon = ACCURACY);
        }
    }

    // isoparametric elements reproduce linear fields exactly
    let embedded = Mesh::from_points(&[
        [0.3, 0.4, 0.5],
        [1.7, 2.2, 1.1],
        [2.9, 0.1, 2.6],
        [3.5, 1.0, 1.0],
    ]);
    assert_eq!(container.add_embedded_mesh(&embedded).unwrap(), vec![3]);

    let field = |p: &[f64]| DVector::from_vec(vec![2.0 * p[0] - p[2], p[1] + 0.5]);
    let values = DMatrix::from_fn(mesh.number_of_nodes(), 2, |r, c| {
        field(&[mesh.positions()[(r, 0)], mesh.positions()[(r, 1)], mesh.positions()[(r, 2)]])[c]
    });
    let interpolated = container.interpolate_field(&embedded, &values).unwrap();
    for node in 0..3 {
        let p = embedded.position(node);
        assert_relative_eq!(
            interpolated.row(node).transpose(),
            field(p.as_slice()),
            epsilon = ACCURACY
        );
    }
}

#[test]
fn tetrahedra_around_a_cube_diagonal() {
    let mesh = Mesh::from_points(&[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
    ]);
    let tets = [[0, 1, 2, 6], [0, 2, 3, 6], [0, 3, 7, 6], [0, 7, 4, 6], [0, 4, 5, 6], [0, 5, 1, 6]];
    let domain = Domain::<Tetrahedron>::new(&mesh, "tets", &tets).unwrap();
    let container = BarycentricContainer::new(&domain).unwrap();

    let mut points = Vec::new();
    for k in 0..5 {
        for j in 0..5 {
            for i in 0..5 {
                points.push([0.1 + 0.2 * i as f64, 0.1 + 0.2 * j as f64, 0.1 + 0.2 * k as f64]);
            }
        }
    }
    let points = DMatrix::from_fn(points.len(), 3, |r, c| points[r][c]);

    for (row, lp) in container.locate_many(&points).unwrap().iter().enumerate() {
        let x = container
            .interpolate_at(lp, mesh.positions())
            .unwrap()
            .expect("every sample lies inside the cube");
        assert_relative_eq!(x, points.row(row).transpose(), epsilon = ACCURACY);
    }

    assert!(!container.locate(&DVector::from_vec(vec![0.5, 0.5, 1.01])).unwrap().is_found());
}

#[test]
fn triangles_on_a_tilted_plane() {
    // the unit square lifted onto the plane z = x
    let mesh = Mesh::from_points(&[
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 0.0],
    ]);
    let domain = Domain::<Triangle>::new(&mesh, "surface", &[[0, 1, 2], [0, 2, 3]]).unwrap();
    let mut container = BarycentricContainer::new(&domain).unwrap();

    let embedded = Mesh::from_points(&[[0.75, 0.25, 0.75], [0.25, 0.75, 0.25], [0.5, 0.5, 0.9]]);
    assert_eq!(container.add_embedded_mesh(&embedded).unwrap(), vec![2]);
    assert_eq!(container.locate_node(&embedded, 0).unwrap().element_index, Some(0));
    assert_eq!(container.locate_node(&embedded, 1).unwrap().element_index, Some(1));

    let interpolated = container.interpolate_field(&embedded, mesh.positions()).unwrap();
    for node in 0..2 {
        assert_relative_eq!(
            interpolated.row(node).transpose(),
            embedded.position(node),
            epsilon = ACCURACY
        );
    }
}

#[test]
fn segments_on_a_line() {
    let mesh = Mesh::from_points(&[[0.0], [1.0], [2.0], [3.0]]);
    let domain = Domain::<Segment>::from_flat_indices(&mesh, "line", &[0, 1, 1, 2, 2, 3]).unwrap();
    let container = BarycentricContainer::new(&domain).unwrap();

    let lp = container.locate(&DVector::from_vec(vec![2.25])).unwrap();
    assert_eq!(lp.element_index, Some(2));
    assert_abs_diff_eq!(lp.local_coordinates[0], -0.5, epsilon = ACCURACY);

    // a shared node belongs to either neighbor; whichever is reported maps back onto it
    let lp = container.locate(&DVector::from_vec(vec![2.0])).unwrap();
    let element = domain.element(lp.element_index.unwrap());
    assert_abs_diff_eq!(
        element.world_coordinates(&lp.local_coordinates)[0],
        2.0,
        epsilon = ACCURACY
    );

    assert!(!container.locate(&DVector::from_vec(vec![-0.1])).unwrap().is_found());
}
