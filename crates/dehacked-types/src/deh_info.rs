use serde::Serialize;

use crate::sprite_name::SpriteName;

/// Global gameplay constants editable from a `Misc` section.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DehInfo {
    pub start_health: i32,
    pub start_bullets: i32,
    pub max_health: i32,
    pub max_armor: i32,
    pub green_ac: i32,
    pub blue_ac: i32,
    pub max_soulsphere: i32,
    pub soulsphere_health: i32,
    pub megasphere_health: i32,
    pub god_health: i32,
    pub fa_armor: i32,
    pub fa_ac: i32,
    pub kfa_armor: i32,
    pub kfa_ac: i32,
    pub player_sprite: SpriteName,
    /// Render style index for rocket explosions; 255 defers to the user's
    /// setting.
    pub explosion_style: u8,
    pub explosion_alpha: f64,
    pub no_autofreeze: i32,
    pub bfg_cells: i32,
    /// 1 = monsters infight, 0 = engine default, -1 = monsters ignore each
    /// other.
    pub infighting: i32,
}

impl Default for DehInfo {
    fn default() -> Self {
        DehInfo {
            start_health: 100,
            start_bullets: 50,
            max_health: 100,
            max_armor: 200,
            green_ac: 1,
            blue_ac: 2,
            max_soulsphere: 200,
            soulsphere_health: 100,
            megasphere_health: 200,
            god_health: 100,
            fa_armor: 200,
            fa_ac: 2,
            kfa_armor: 200,
            kfa_ac: 2,
            player_sprite: SpriteName::new("PLAY"),
            explosion_style: 255,
            explosion_alpha: 2.0 / 3.0,
            no_autofreeze: 0,
            bfg_cells: 40,
            infighting: 0,
        }
    }
}
