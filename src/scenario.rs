use anyhow::{Context, Result};
use rand::prelude::*;
use std::fs::File;
use std::io::{self, BufReader, Write};
use tracing::info;

use crate::common::{ItemInput, LocationInput, RouteRequest};
use crate::layout::shelf_slots;
use crate::map::Map;

const SKU_CATALOGUE: &[&str] = &[
    "SKU-APPLE-01",
    "SKU-BANANA-02",
    "SKU-CEREAL-03",
    "SKU-DETERGENT-04",
    "SKU-EGGS-05",
    "SKU-FLOUR-06",
    "SKU-GRANOLA-07",
    "SKU-HONEY-08",
    "SKU-ICETEA-09",
    "SKU-JAM-10",
    "SKU-KETCHUP-11",
    "SKU-LENTILS-12",
];

const MAX_QUANTITY: i64 = 5;

/// Random picklist over the pickable shelf faces of `map`.
///
/// Terminals are left to the map defaults.
pub fn generate_request<R: Rng + ?Sized>(
    map: &Map,
    num_items: usize,
    rng: &mut R,
) -> Result<RouteRequest, String> {
    let slots = shelf_slots(map);
    if slots.is_empty() && num_items > 0 {
        return Err("Floor plan has no pickable shelf faces".to_string());
    }

    let mut items_to_pick = Vec::with_capacity(num_items);
    for _ in 0..num_items {
        let (Some(sku), Some(slot)) = (SKU_CATALOGUE.choose(rng), slots.choose(rng)) else {
            return Err("Ran out of candidates unexpectedly".to_string());
        };
        items_to_pick.push(ItemInput {
            master_item_id: sku.to_string(),
            quantity: rng.gen_range(1..=MAX_QUANTITY),
            location: Some(LocationInput {
                x: slot.block.x,
                y: slot.block.y,
                shelf_id: slot.shelf_id,
                facing: Some(slot.facing.to_string()),
            }),
            facing: None,
        });
    }

    info!(
        "Generated {} picklist lines over {} shelf faces",
        items_to_pick.len(),
        slots.len()
    );
    Ok(RouteRequest {
        room_width: Some(map.width),
        room_height: Some(map.height),
        items_to_pick,
        start_point: None,
        end_point: None,
    })
}

pub fn load_request_from_file(path: &str) -> Result<RouteRequest> {
    let file = File::open(path).with_context(|| format!("error opening request file: {path}"))?;
    let reader = BufReader::new(file);
    let request = serde_json::from_reader(reader)
        .with_context(|| format!("error parsing request file: {path}"))?;
    Ok(request)
}

pub fn write_request_to_file(path: &str, request: &RouteRequest) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    let json_data = serde_json::to_string_pretty(request)?;
    writer.write_all(json_data.as_bytes())?;
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Coord;
    use crate::config::EngineConfig;
    use crate::layout::{resolve_access_point, Facing};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generate_request_is_seeded() {
        let map = Map::warehouse(9, 9).unwrap();

        let first = generate_request(&map, 10, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = generate_request(&map, 10, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.items_to_pick.len(), 10);
        assert_eq!((first.room_width, first.room_height), (Some(9), Some(9)));
    }

    #[test]
    fn test_generated_items_are_valid_slots() {
        let map = Map::warehouse(7, 7).unwrap();
        let request = generate_request(&map, 25, &mut StdRng::seed_from_u64(7)).unwrap();
        let validated = request.validate(&EngineConfig::default()).unwrap();

        for item in &validated.items {
            assert!((1..=5).contains(&item.quantity));
            assert!(!map.is_passable(item.location));
            assert!(matches!(item.facing, Facing::North | Facing::South));
            let access = resolve_access_point(&map, item.location, item.facing);
            assert_eq!(access.fallback, None);
        }
    }

    #[test]
    fn test_generate_request_without_shelves() {
        let map =
            Map::from_map_str("type octile\nheight 3\nwidth 3\nmap\n...\n...\n...\n").unwrap();
        assert!(generate_request(&map, 3, &mut StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn test_request_file_round_trip() {
        let path = std::env::temp_dir()
            .join(format!("pick_route_request_{}.json", std::process::id()));
        let path = path.to_string_lossy().to_string();
        let mut request = generate_request(
            &Map::warehouse(7, 7).unwrap(),
            3,
            &mut StdRng::seed_from_u64(1),
        )
        .unwrap();
        request.start_point = Some(Coord::new(0, 0));

        write_request_to_file(&path, &request).unwrap();
        let loaded = load_request_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(loaded, request);
    }

    #[test]
    fn test_load_missing_file() {
        assert!(load_request_from_file("no/such/request.json").is_err());
    }
}
