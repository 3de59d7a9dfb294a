use super::{DistanceMatrix, Tour};
use crate::common::{NodeSet, Path};
use crate::error::Diagnostic;

use tracing::warn;

/// Joins the tour's legs into one waypoint sequence.
///
/// Every leg after the first drops its leading coordinate, which repeats the
/// previous leg's last one. Unreachable legs contribute nothing.
pub fn assemble_path(
    tour: &Tour,
    nodes: &NodeSet,
    matrix: &DistanceMatrix,
    diagnostics: &mut Vec<Diagnostic>,
) -> Path {
    let mut path = Vec::new();
    let Some(&first) = tour.nodes.first() else {
        return path;
    };
    path.push(nodes.node(first).coord);

    for (from, to) in tour.legs() {
        match matrix.leg(from, to) {
            Some(leg) => path.extend(leg.path.iter().skip(1)),
            None => {
                let (from, to) = (nodes.node(from).id, nodes.node(to).id);
                warn!("{} tour: skipping unreachable leg {from} -> {to}", tour.kind);
                diagnostics.push(Diagnostic::LegUnreachable {
                    tour: tour.kind,
                    from,
                    to,
                });
            }
        }
    }

    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{Coord, NodeId, PickRequestItem, TourKind};
    use crate::layout::Facing;
    use crate::map::Map;
    use crate::stat::Stats;

    fn setup(map: &Map, items: &[PickRequestItem]) -> (NodeSet, DistanceMatrix) {
        let nodes = NodeSet::build(
            map,
            items,
            map.default_entry(),
            map.default_exit(),
            &mut Vec::new(),
        )
        .unwrap();
        let matrix =
            DistanceMatrix::build(map, &nodes, false, None, &mut Stats::default()).unwrap();
        (nodes, matrix)
    }

    fn north_item(x: usize, y: usize) -> PickRequestItem {
        PickRequestItem {
            master_item_id: "A".to_string(),
            quantity: 1,
            shelf_id: 1,
            location: Coord::new(x, y),
            facing: Facing::North,
        }
    }

    #[test]
    fn test_assemble_joins_legs_without_duplicates() {
        let map = Map::warehouse(7, 7).unwrap();
        let (nodes, matrix) = setup(&map, &[north_item(1, 1)]);
        let tour = Tour {
            kind: TourKind::Optimized,
            nodes: vec![0, 1, 2],
        };
        let diagnostics = &mut Vec::new();
        let path = assemble_path(&tour, &nodes, &matrix, diagnostics);

        let expected_len = matrix.cost(0, 1).unwrap() + matrix.cost(1, 2).unwrap() + 1;
        assert_eq!(path.len(), expected_len);
        assert_eq!(path.first(), Some(&Coord::new(0, 3)));
        assert_eq!(path.last(), Some(&Coord::new(6, 3)));
        assert!(path.contains(&Coord::new(1, 0)));
        for step in path.windows(2) {
            assert_eq!(step[0].manhattan(step[1]), 1);
        }
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_assemble_skips_unreachable_leg() {
        let map = Map::from_map_str(
            "type octile\nheight 3\nwidth 6\nmap\n...@..\n.@.@..\n...@..\n",
        )
        .unwrap();
        let (nodes, matrix) = setup(&map, &[north_item(1, 1)]);
        let tour = Tour {
            kind: TourKind::Baseline,
            nodes: vec![0, 1, 2],
        };
        let diagnostics = &mut Vec::new();
        let path = assemble_path(&tour, &nodes, &matrix, diagnostics);

        assert_eq!(
            path,
            vec![Coord::new(0, 1), Coord::new(0, 0), Coord::new(1, 0)]
        );
        assert_eq!(
            *diagnostics,
            vec![Diagnostic::LegUnreachable {
                tour: TourKind::Baseline,
                from: nodes.node(1).id,
                to: NodeId::End,
            }]
        );
    }
}
