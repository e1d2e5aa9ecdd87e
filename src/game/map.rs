//! Tile Map Layout
//!
//! A level map is four CSV grids of integer codes, one per layer, all on
//! the same tile grid. `-1` marks an empty cell. The codes only decide
//! what is spawned where; geometry comes from the level config.

use serde::{Serialize, Deserialize};

use crate::game::error::ContentError;
use crate::game::state::{SpawnKind, TileKind};

/// Empty cell in every layer.
pub const EMPTY_CELL: i32 = -1;

/// Entity layer code of the player start.
pub const PLAYER_CODE: i32 = 394;
/// Entity layer code of a bamboo.
pub const BAMBOO_CODE: i32 = 390;
/// Entity layer code of a spirit.
pub const SPIRIT_CODE: i32 = 391;
/// Entity layer code of a raccoon.
pub const RACCOON_CODE: i32 = 392;
/// Entity layer code of a squid.
pub const SQUID_CODE: i32 = 393;

/// One CSV layer.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    rows: Vec<Vec<i32>>,
}

impl TileGrid {
    /// Parse comma-separated rows. Blank lines are skipped; ragged rows
    /// are allowed.
    pub fn parse(layer: &'static str, csv: &str) -> Result<Self, ContentError> {
        let rows = csv
            .lines()
            .filter(|line| !line.trim().is_empty())
            .enumerate()
            .map(|(row, line)| {
                line.split(',')
                    .enumerate()
                    .map(|(col, cell)| {
                        let cell = cell.trim();
                        cell.parse::<i32>().map_err(|_| ContentError::MalformedCell {
                            layer,
                            cell: cell.to_string(),
                            row,
                            col,
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rows })
    }

    /// Parsed rows, top to bottom.
    pub fn rows(&self) -> &[Vec<i32>] {
        &self.rows
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Non-empty cells as `(row, col, code)`, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, i32)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(|(_, code)| **code != EMPTY_CELL)
                .map(move |(col, code)| (row, col, *code))
        })
    }
}

/// Something to spawn at a grid cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Placement {
    /// Grid row
    pub row: usize,
    /// Grid column
    pub col: usize,
    /// What goes there
    pub kind: SpawnKind,
}

/// All four layers of a map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapLayout {
    /// Invisible walls
    pub boundary: TileGrid,
    /// Breakable bushes
    pub grass: TileGrid,
    /// Trees, rocks and statues
    pub object: TileGrid,
    /// Player start and monsters
    pub entities: TileGrid,
}

impl MapLayout {
    /// Parse all four layers.
    pub fn from_csv(boundary: &str, grass: &str, object: &str, entities: &str) -> Result<Self, ContentError> {
        Ok(Self {
            boundary: TileGrid::parse("boundary", boundary)?,
            grass: TileGrid::parse("grass", grass)?,
            object: TileGrid::parse("object", object)?,
            entities: TileGrid::parse("entities", entities)?,
        })
    }

    /// Grid size as `(rows, cols)`, the largest over all layers.
    pub fn size(&self) -> (usize, usize) {
        let layers = [&self.boundary, &self.grass, &self.object, &self.entities];
        let rows = layers.iter().map(|grid| grid.height()).max().unwrap_or(0);
        let cols = layers.iter().map(|grid| grid.width()).max().unwrap_or(0);
        (rows, cols)
    }

    /// Spawn list in layer order (boundary, grass, object, entities),
    /// row-major within each layer.
    pub fn placements(&self) -> Result<Vec<Placement>, ContentError> {
        let mut placements = Vec::new();

        let tiles = [
            (&self.boundary, TileKind::Boundary),
            (&self.grass, TileKind::Grass),
            (&self.object, TileKind::Object),
        ];
        for (grid, kind) in tiles {
            // Any code places the tile; the code only picks its graphic.
            placements.extend(grid.cells().map(|(row, col, _)| Placement {
                row,
                col,
                kind: SpawnKind::Tile(kind),
            }));
        }

        for (row, col, code) in self.entities.cells() {
            let kind = entity_kind(code).ok_or_else(|| ContentError::InvalidTileCode {
                layer: "entities",
                code,
                row,
                col,
            })?;
            placements.push(Placement { row, col, kind });
        }

        Ok(placements)
    }
}

fn entity_kind(code: i32) -> Option<SpawnKind> {
    let monster = match code {
        PLAYER_CODE => return Some(SpawnKind::Player),
        BAMBOO_CODE => "bamboo",
        SPIRIT_CODE => "spirit",
        RACCOON_CODE => "raccoon",
        SQUID_CODE => "squid",
        _ => return None,
    };
    Some(SpawnKind::Enemy(monster.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::vec2::FixedVec2;
    use crate::game::entity::Movable;
    use crate::game::state::{Group, Level};
    use crate::game::tables::GameTables;
    use crate::game::tick::LevelConfig;

    const BOUNDARY: &str = "395,395,395\n395,-1,395\n395,395,395\n";
    const GRASS: &str = "-1,-1,-1\n-1,-1,-1\n-1,8,-1\n";
    const OBJECT: &str = "-1,-1,-1\n-1,-1,-1\n-1,-1,-1\n";
    const ENTITIES: &str = "-1,-1,-1\n-1,394,-1\n-1,-1,393\n";

    #[test]
    fn test_parse_grid() {
        let grid = TileGrid::parse("grass", " -1, 8 \n\n3,-1\n").unwrap();
        assert_eq!(grid.rows(), &[vec![-1, 8], vec![3, -1]]);
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(cells, vec![(0, 1, 8), (1, 0, 3)]);
    }

    #[test]
    fn test_malformed_cell() {
        let err = TileGrid::parse("object", "1,2\n3,x\n").unwrap_err();
        assert_eq!(
            err,
            ContentError::MalformedCell { layer: "object", cell: "x".into(), row: 1, col: 1 }
        );
    }

    #[test]
    fn test_unknown_entity_code() {
        let layout = MapLayout::from_csv("", "", "", "-1,500\n").unwrap();
        assert_eq!(
            layout.placements(),
            Err(ContentError::InvalidTileCode { layer: "entities", code: 500, row: 0, col: 1 })
        );
    }

    #[test]
    fn test_placements_in_layer_order() {
        let layout = MapLayout::from_csv(BOUNDARY, GRASS, OBJECT, ENTITIES).unwrap();
        let placements = layout.placements().unwrap();
        assert_eq!(placements.len(), 8 + 1 + 2);
        assert_eq!(placements[0].kind, SpawnKind::Tile(TileKind::Boundary));
        assert_eq!(placements[8], Placement { row: 2, col: 1, kind: SpawnKind::Tile(TileKind::Grass) });
        assert_eq!(placements[9].kind, SpawnKind::Player);
        assert_eq!(placements[10].kind, SpawnKind::Enemy("squid".into()));
    }

    #[test]
    fn test_layout_size_spans_all_layers() {
        let layout = MapLayout::from_csv("395,395\n", "-1,-1,-1\n", "", "-1\n-1\n-1\n-1\n").unwrap();
        assert_eq!(layout.size(), (4, 3));
        assert_eq!(MapLayout::default().size(), (0, 0));
    }

    #[test]
    fn test_oversized_map_is_rejected() {
        let mut row = vec!["-1"; 512];
        row[509] = "394";
        let entities = row.join(",");
        row[509] = "-1";
        row[511] = "395";
        let boundary = row.join(",");

        let layout = MapLayout::from_csv(&boundary, "", "", &entities).unwrap();
        let err = Level::from_layout(&layout, GameTables::default(), LevelConfig::default()).unwrap_err();
        assert_eq!(err, ContentError::MapTooLarge { rows: 1, cols: 512 });
    }

    #[test]
    fn test_level_from_layout() {
        let layout = MapLayout::from_csv(BOUNDARY, GRASS, OBJECT, ENTITIES).unwrap();
        let level = Level::from_layout(&layout, GameTables::default(), LevelConfig::default()).unwrap();

        assert_eq!(level.props().len(), 9);
        assert_eq!(level.enemies().len(), 1);
        assert_eq!(level.groups().get(Group::Obstacle).len(), 9);
        assert_eq!(level.groups().get(Group::Attackable).len(), 2);

        let player = level.player().unwrap();
        assert_eq!(player.body().rect.center(), FixedVec2::from_ints(96, 96));
    }
}
