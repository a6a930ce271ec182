//! Block type ids and per-type properties.

pub const AIR: u16 = 0;
pub const STONE: u16 = 1;
pub const GRASS: u16 = 2;
pub const DIRT: u16 = 3;
pub const COBBLESTONE: u16 = 4;
pub const WOOD: u16 = 5;
pub const SAPLING: u16 = 6;
pub const BEDROCK: u16 = 7;
pub const WATER: u16 = 8;
pub const STATIONARY_WATER: u16 = 9;
pub const LAVA: u16 = 10;
pub const STATIONARY_LAVA: u16 = 11;
pub const SAND: u16 = 12;
pub const GRAVEL: u16 = 13;
pub const GOLD_ORE: u16 = 14;
pub const IRON_ORE: u16 = 15;
pub const COAL_ORE: u16 = 16;
pub const LOG: u16 = 17;
pub const LEAVES: u16 = 18;
pub const GLASS: u16 = 20;
pub const SANDSTONE: u16 = 24;
pub const NOTE_BLOCK: u16 = 25;
pub const LONG_GRASS: u16 = 31;
pub const DEAD_BUSH: u16 = 32;
pub const WOOL: u16 = 35;
pub const YELLOW_FLOWER: u16 = 37;
pub const RED_FLOWER: u16 = 38;
pub const BROWN_MUSHROOM: u16 = 39;
pub const RED_MUSHROOM: u16 = 40;
pub const MOSSY_COBBLESTONE: u16 = 48;
pub const OBSIDIAN: u16 = 49;
pub const TORCH: u16 = 50;
pub const FIRE: u16 = 51;
pub const MOB_SPAWNER: u16 = 52;
pub const CHEST: u16 = 54;
pub const FURNACE: u16 = 61;
pub const SIGN_POST: u16 = 63;
pub const WALL_SIGN: u16 = 68;
pub const SNOW: u16 = 78;
pub const ICE: u16 = 79;
pub const SNOW_BLOCK: u16 = 80;
pub const CACTUS: u16 = 81;
pub const CLAY: u16 = 82;
pub const REED: u16 = 83;
pub const PUMPKIN: u16 = 86;
pub const NETHERRACK: u16 = 87;
pub const MYCELIUM: u16 = 110;

const NAMES: &[(u16, &str)] = &[
    (AIR, "Air"),
    (STONE, "Stone"),
    (GRASS, "Grass"),
    (DIRT, "Dirt"),
    (COBBLESTONE, "Cobblestone"),
    (WOOD, "Wood"),
    (SAPLING, "Sapling"),
    (BEDROCK, "Bedrock"),
    (WATER, "Water"),
    (STATIONARY_WATER, "Water (stationary)"),
    (LAVA, "Lava"),
    (STATIONARY_LAVA, "Lava (stationary)"),
    (SAND, "Sand"),
    (GRAVEL, "Gravel"),
    (GOLD_ORE, "Gold ore"),
    (IRON_ORE, "Iron ore"),
    (COAL_ORE, "Coal ore"),
    (LOG, "Log"),
    (LEAVES, "Leaves"),
    (GLASS, "Glass"),
    (SANDSTONE, "Sandstone"),
    (NOTE_BLOCK, "Note block"),
    (LONG_GRASS, "Tall grass"),
    (DEAD_BUSH, "Dead bush"),
    (WOOL, "Wool"),
    (YELLOW_FLOWER, "Yellow flower"),
    (RED_FLOWER, "Red rose"),
    (BROWN_MUSHROOM, "Brown mushroom"),
    (RED_MUSHROOM, "Red mushroom"),
    (MOSSY_COBBLESTONE, "Mossy cobblestone"),
    (OBSIDIAN, "Obsidian"),
    (TORCH, "Torch"),
    (FIRE, "Fire"),
    (MOB_SPAWNER, "Mob spawner"),
    (CHEST, "Chest"),
    (FURNACE, "Furnace"),
    (SIGN_POST, "Sign post"),
    (WALL_SIGN, "Wall sign"),
    (SNOW, "Snow"),
    (ICE, "Ice"),
    (SNOW_BLOCK, "Snow block"),
    (CACTUS, "Cactus"),
    (CLAY, "Clay"),
    (REED, "Reed"),
    (PUMPKIN, "Pumpkin"),
    (NETHERRACK, "Netherrack"),
    (MYCELIUM, "Mycelium"),
];

/// Display name for a block id, "Unknown" for ids without one.
pub fn name(id: u16) -> &'static str {
    NAMES
        .iter()
        .find(|(i, _)| *i == id)
        .map(|(_, n)| *n)
        .unwrap_or("Unknown")
}

/// Blocks that make up undisturbed terrain (naturalize, snow cover).
pub fn is_natural_terrain(id: u16) -> bool {
    matches!(
        id,
        STONE | GRASS | DIRT | BEDROCK | SAND | GRAVEL | CLAY | MYCELIUM
            | GOLD_ORE | IRON_ORE | COAL_ORE | SANDSTONE
    )
}

/// Blocks a flood or hollow scan may pass through.
pub fn can_pass_through(id: u16) -> bool {
    matches!(
        id,
        AIR | WATER | STATIONARY_WATER | LAVA | STATIONARY_LAVA | SAPLING
            | LONG_GRASS | DEAD_BUSH | YELLOW_FLOWER | RED_FLOWER
            | BROWN_MUSHROOM | RED_MUSHROOM | TORCH | FIRE | SNOW | REED
    )
}

pub fn is_liquid(id: u16) -> bool {
    matches!(id, WATER | STATIONARY_WATER | LAVA | STATIONARY_LAVA)
}

pub fn is_water(id: u16) -> bool {
    matches!(id, WATER | STATIONARY_WATER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names() {
        assert_eq!(name(STONE), "Stone");
        assert_eq!(name(4000), "Unknown");
    }

    #[test]
    fn test_properties() {
        assert!(is_natural_terrain(DIRT));
        assert!(!is_natural_terrain(WOOD));
        assert!(can_pass_through(AIR));
        assert!(can_pass_through(STATIONARY_WATER));
        assert!(!can_pass_through(STONE));
        assert!(is_liquid(LAVA));
        assert!(is_water(WATER));
        assert!(!is_water(LAVA));
    }
}
