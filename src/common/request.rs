use super::Coord;
use crate::config::EngineConfig;
use crate::error::InputError;
use crate::layout::Facing;

use serde::{Deserialize, Serialize};

pub type PointInput = Coord;

/// Route request as it arrives on the wire.
///
/// Fields a caller may forget are optional here so that validation can
/// report exactly which one is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_width: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_height: Option<usize>,
    #[serde(default)]
    pub items_to_pick: Vec<ItemInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_point: Option<PointInput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_point: Option<PointInput>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemInput {
    #[serde(default)]
    pub master_item_id: String,
    pub quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationInput>,
    /// Accepted here as well as inside `location`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationInput {
    pub x: usize,
    pub y: usize,
    #[serde(default)]
    pub shelf_id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickRequestItem {
    pub master_item_id: String,
    pub quantity: u32,
    pub shelf_id: u32,
    pub location: Coord,
    pub facing: Facing,
}

/// Validated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickRequest {
    pub room_width: usize,
    pub room_height: usize,
    pub items: Vec<PickRequestItem>,
    pub start: Option<Coord>,
    pub end: Option<Coord>,
}

impl RouteRequest {
    pub fn from_json_str(content: &str) -> Result<Self, InputError> {
        serde_json::from_str(content).map_err(|e| InputError::Malformed(e.to_string()))
    }

    pub fn validate(&self, config: &EngineConfig) -> Result<PickRequest, InputError> {
        if self.items_to_pick.is_empty() {
            return Err(InputError::EmptyPicklist);
        }

        let room_width = self.room_width.unwrap_or(config.room_width);
        let room_height = self.room_height.unwrap_or(config.room_height);
        if room_width < crate::map::MIN_ROOM_SIDE || room_height < crate::map::MIN_ROOM_SIDE {
            return Err(InputError::RoomTooSmall {
                width: room_width,
                height: room_height,
            });
        }

        self.validated_with_room(room_width, room_height)
    }

    /// Validation for a request routed on a supplied floor plan.
    ///
    /// The plan's size replaces the request's room size, which is not checked.
    pub fn validate_for_floor_plan(
        &self,
        width: usize,
        height: usize,
    ) -> Result<PickRequest, InputError> {
        if self.items_to_pick.is_empty() {
            return Err(InputError::EmptyPicklist);
        }
        self.validated_with_room(width, height)
    }

    fn validated_with_room(
        &self,
        room_width: usize,
        room_height: usize,
    ) -> Result<PickRequest, InputError> {
        let items = self
            .items_to_pick
            .iter()
            .enumerate()
            .map(|(index, item)| item.validate(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PickRequest {
            room_width,
            room_height,
            items,
            start: self.start_point,
            end: self.end_point,
        })
    }
}

impl ItemInput {
    fn validate(&self, index: usize) -> Result<PickRequestItem, InputError> {
        let master_item_id = self.master_item_id.trim();
        if master_item_id.is_empty() {
            return Err(InputError::MissingItemId { index });
        }
        let master_item_id = master_item_id.to_string();

        let Some(location) = &self.location else {
            return Err(InputError::MissingLocation {
                index,
                master_item_id,
            });
        };

        let Some(raw_facing) = location.facing.as_ref().or(self.facing.as_ref()) else {
            return Err(InputError::MissingFacing {
                index,
                master_item_id,
            });
        };
        let facing = raw_facing
            .parse::<Facing>()
            .map_err(|value| InputError::UnknownFacing {
                index,
                master_item_id: master_item_id.clone(),
                value,
            })?;

        let quantity = match u32::try_from(self.quantity) {
            Ok(quantity) if quantity > 0 => quantity,
            _ => {
                return Err(InputError::InvalidQuantity {
                    index,
                    master_item_id,
                })
            }
        };

        Ok(PickRequestItem {
            master_item_id,
            quantity,
            shelf_id: location.shelf_id,
            location: Coord::new(location.x, location.y),
            facing,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    pub optimized_path: Vec<Coord>,
    pub unoptimized_path: Vec<Coord>,
    pub metrics: MetricsOutput,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsOutput {
    pub unoptimized_distance: f64,
    pub optimized_distance: f64,
    pub distance_saved: f64,
    pub ordered_pick_locations: Vec<Coord>,
    pub pick_sequence_steps: Vec<PickStepOutput>,
    pub time_saved_estimate: String,
    pub entry_point_for_path: Coord,
    pub exit_point_for_path: Coord,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickStepOutput {
    pub step: usize,
    pub shelf_id: u32,
    pub facing: String,
    pub grid_coords: Coord,
    pub items: Vec<PickItemOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickItemOutput {
    pub master_item_id: String,
    pub quantity_to_pick: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> RouteRequest {
        RouteRequest::from_json_str(json).unwrap()
    }

    #[test]
    fn test_validate_full_request() {
        let request = parse(
            r#"{
                "roomWidth": 9, "roomHeight": 7,
                "itemsToPick": [
                    { "masterItemId": "SKU-1", "quantity": 2,
                      "location": { "x": 3, "y": 1, "shelfId": 5, "facing": "S" } }
                ],
                "startPoint": { "x": 0, "y": 0 }
            }"#,
        );
        let validated = request.validate(&EngineConfig::default()).unwrap();

        assert_eq!(validated.room_width, 9);
        assert_eq!(validated.room_height, 7);
        assert_eq!(validated.start, Some(Coord::new(0, 0)));
        assert_eq!(validated.end, None);
        assert_eq!(
            validated.items,
            vec![PickRequestItem {
                master_item_id: "SKU-1".to_string(),
                quantity: 2,
                shelf_id: 5,
                location: Coord::new(3, 1),
                facing: Facing::South,
            }]
        );
    }

    #[test]
    fn test_validate_defaults_room_and_accepts_item_level_facing() {
        let request = parse(
            r#"{ "itemsToPick": [
                { "masterItemId": "A", "quantity": 1, "facing": "N",
                  "location": { "x": 1, "y": 1, "shelfId": 1 } }
            ] }"#,
        );
        let validated = request.validate(&EngineConfig::default()).unwrap();

        assert_eq!((validated.room_width, validated.room_height), (7, 7));
        assert_eq!(validated.items[0].facing, Facing::North);
    }

    #[test]
    fn test_validate_empty_picklist() {
        let request = parse(r#"{ "roomWidth": 7, "roomHeight": 7, "itemsToPick": [] }"#);
        assert_eq!(
            request.validate(&EngineConfig::default()),
            Err(InputError::EmptyPicklist)
        );
    }

    #[test]
    fn test_validate_missing_fields() {
        let no_location = parse(r#"{ "itemsToPick": [ { "masterItemId": "A", "quantity": 1 } ] }"#);
        assert_eq!(
            no_location.validate(&EngineConfig::default()),
            Err(InputError::MissingLocation {
                index: 0,
                master_item_id: "A".to_string()
            })
        );

        let no_facing = parse(
            r#"{ "itemsToPick": [ { "masterItemId": "A", "quantity": 1,
                 "location": { "x": 1, "y": 1, "shelfId": 1 } } ] }"#,
        );
        assert_eq!(
            no_facing.validate(&EngineConfig::default()),
            Err(InputError::MissingFacing {
                index: 0,
                master_item_id: "A".to_string()
            })
        );

        let no_id = parse(
            r#"{ "itemsToPick": [ { "quantity": 1,
                 "location": { "x": 1, "y": 1, "facing": "N" } } ] }"#,
        );
        assert_eq!(
            no_id.validate(&EngineConfig::default()),
            Err(InputError::MissingItemId { index: 0 })
        );
    }

    #[test]
    fn test_validate_bad_values() {
        let bad_facing = parse(
            r#"{ "itemsToPick": [ { "masterItemId": "A", "quantity": 1,
                 "location": { "x": 1, "y": 1, "facing": "Q" } } ] }"#,
        );
        assert!(matches!(
            bad_facing.validate(&EngineConfig::default()),
            Err(InputError::UnknownFacing { value, .. }) if value == "Q"
        ));

        let zero_quantity = parse(
            r#"{ "itemsToPick": [ { "masterItemId": "A", "quantity": 0,
                 "location": { "x": 1, "y": 1, "facing": "N" } } ] }"#,
        );
        assert!(matches!(
            zero_quantity.validate(&EngineConfig::default()),
            Err(InputError::InvalidQuantity { .. })
        ));

        let tiny_room = parse(
            r#"{ "roomWidth": 2, "itemsToPick": [ { "masterItemId": "A", "quantity": 1,
                 "location": { "x": 1, "y": 1, "facing": "N" } } ] }"#,
        );
        assert_eq!(
            tiny_room.validate(&EngineConfig::default()),
            Err(InputError::RoomTooSmall {
                width: 2,
                height: 7
            })
        );
    }

    #[test]
    fn test_validate_for_floor_plan_ignores_room_size() {
        let request = parse(
            r#"{ "roomWidth": 1, "roomHeight": 2, "itemsToPick": [
                { "masterItemId": "A", "quantity": 1,
                  "location": { "x": 1, "y": 1, "facing": "N" } } ] }"#,
        );
        assert!(request.validate(&EngineConfig::default()).is_err());

        let validated = request.validate_for_floor_plan(10, 3).unwrap();
        assert_eq!((validated.room_width, validated.room_height), (10, 3));
        assert_eq!(validated.items.len(), 1);

        let empty = parse(r#"{ "roomWidth": 1, "itemsToPick": [] }"#);
        assert_eq!(
            empty.validate_for_floor_plan(10, 3),
            Err(InputError::EmptyPicklist)
        );
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            RouteRequest::from_json_str(r#"{ "itemsToPick": [ { "quantity": "many" } ] }"#),
            Err(InputError::Malformed(_))
        ));
    }

    #[test]
    fn test_response_uses_camel_case() {
        let step = PickStepOutput {
            step: 1,
            shelf_id: 2,
            facing: "N".to_string(),
            grid_coords: Coord::new(1, 0),
            items: vec![PickItemOutput {
                master_item_id: "A".to_string(),
                quantity_to_pick: 3,
            }],
        };
        let json = serde_json::to_value(&step).unwrap();
        assert_eq!(json["shelfId"], 2);
        assert_eq!(json["gridCoords"]["x"], 1);
        assert_eq!(json["items"][0]["quantityToPick"], 3);
    }
}
