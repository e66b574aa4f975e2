use bitflags::bitflags;
use serde::Serialize;

bitflags! {
    /// Primary actor flag word. The low 26 bits keep their classic Doom
    /// positions; the high bits are engine extensions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct ActorFlags: u32 {
        const SPECIAL          = 0x0000_0001;
        const SOLID            = 0x0000_0002;
        const SHOOTABLE        = 0x0000_0004;
        const NOSECTOR         = 0x0000_0008;
        const NOBLOCKMAP       = 0x0000_0010;
        const AMBUSH           = 0x0000_0020;
        const JUSTHIT          = 0x0000_0040;
        const JUSTATTACKED     = 0x0000_0080;
        const SPAWNCEILING     = 0x0000_0100;
        const NOGRAVITY        = 0x0000_0200;
        const DROPOFF          = 0x0000_0400;
        const PICKUP           = 0x0000_0800;
        const NOCLIP           = 0x0000_1000;
        const FLOAT            = 0x0000_4000;
        const TELEPORT         = 0x0000_8000;
        const MISSILE          = 0x0001_0000;
        const DROPPED          = 0x0002_0000;
        const SHADOW           = 0x0004_0000;
        const NOBLOOD          = 0x0008_0000;
        const CORPSE           = 0x0010_0000;
        const INFLOAT          = 0x0020_0000;
        const COUNTKILL        = 0x0040_0000;
        const COUNTITEM        = 0x0080_0000;
        const SKULLFLY         = 0x0100_0000;
        const NOTDMATCH        = 0x0200_0000;
        const SPAWNSOUNDSOURCE = 0x0400_0000;
        const FRIENDLY         = 0x0800_0000;
        const UNMORPHED        = 0x1000_0000;
        const NOLIFTDROP       = 0x2000_0000;
        const STEALTH          = 0x4000_0000;
        const ICECORPSE        = 0x8000_0000;
    }
}

bitflags! {
    /// Second actor flag word.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct ActorFlags2: u32 {
        const WINDTHRUST        = 0x0000_0002;
        const BLASTED           = 0x0000_0008;
        const FLY               = 0x0000_0010;
        const FLOORCLIP         = 0x0000_0020;
        const SPAWNFLOAT        = 0x0000_0040;
        const NOTELEPORT        = 0x0000_0080;
        const RIP               = 0x0000_0100;
        const PUSHABLE          = 0x0000_0200;
        const SLIDESONWALLS     = 0x0000_0400;
        const ONMOBJ            = 0x0000_0800;
        const PASSMOBJ          = 0x0000_1000;
        const CANNOTPUSH        = 0x0000_2000;
        const THRUGHOST         = 0x0000_4000;
        const BOSS              = 0x0000_8000;
        const NODMGTHRUST       = 0x0002_0000;
        const TELESTOMP         = 0x0004_0000;
        const FLOATBOB          = 0x0008_0000;
        const DONTDRAW          = 0x0010_0000;
        const IMPACT            = 0x0020_0000;
        const PUSHWALL          = 0x0040_0000;
        const MCROSS            = 0x0080_0000;
        const PCROSS            = 0x0100_0000;
        const CANTLEAVEFLOORPIC = 0x0200_0000;
        const NONSHOOTABLE      = 0x0400_0000;
        const INVULNERABLE      = 0x0800_0000;
        const SEEKERMISSILE     = 0x4000_0000;
        const REFLECTIVE        = 0x8000_0000;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct ActorFlags3: u32 {
        const NOBLOCKMONST = 0x0000_0001;
        const ISMONSTER    = 0x0000_0002;
        const NOTARGET     = 0x0000_0004;
        const NORADIUSDMG  = 0x0000_0008;
        const FULLVOLDEATH = 0x0000_0010;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct ActorFlags4: u32 {
        const FORCERADIUSDMG   = 0x0000_0001;
        const DONTHARMCLASS    = 0x0000_0002;
        const CANUSEWALLS      = 0x0000_0004;
        const NOICEDEATH       = 0x0000_0008;
        const MISSILEMORE      = 0x0000_0010;
        const QUICKTORETALIATE = 0x0000_0020;
    }
}

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct ActorFlags6: u32 {
        const TOUCHY     = 0x0000_0001;
        const VULNERABLE = 0x0000_0002;
        const CANJUMP    = 0x0000_0004;
    }
}

bitflags! {
    /// Boss-trigger and sound-volume flags introduced with MBF21.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct ActorFlags8: u32 {
        const RETARGETAFTERSLAM = 0x0000_0001;
        const MAP07BOSS1        = 0x0000_0002;
        const MAP07BOSS2        = 0x0000_0004;
        const E1M8BOSS          = 0x0000_0008;
        const E2M8BOSS          = 0x0000_0010;
        const E3M8BOSS          = 0x0000_0020;
        const E4M6BOSS          = 0x0000_0040;
        const E4M8BOSS          = 0x0000_0080;
        const FULLVOLSEE        = 0x0000_0100;
    }
}

bitflags! {
    /// How a projectile reacts to level geometry.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct BounceFlags: u16 {
        const FLOORS   = 0x0001;
        const CEILINGS = 0x0002;
        const WALLS    = 0x0004;
        /// Bounce behavior requested by a patch rather than by the class.
        const DEH      = 0x0008;
        const COMPAT   = 0x0010;

        const CLASSIC     = Self::FLOORS.bits() | Self::CEILINGS.bits();
        const GRENADE     = Self::CLASSIC.bits() | Self::WALLS.bits();
        const DOOM_COMPAT = Self::FLOORS.bits() | Self::COMPAT.bits();
    }
}

bitflags! {
    /// Trail effects spawned behind a moving actor.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
    pub struct Effects: u8 {
        const ROCKET  = 0x01;
        const GRENADE = 0x02;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_bits_keep_their_positions() {
        assert_eq!(ActorFlags::SPECIAL.bits(), 1);
        assert_eq!(ActorFlags::MISSILE.bits(), 0x10000);
        assert_eq!(ActorFlags::COUNTKILL.bits(), 0x400000);
    }

    #[test]
    fn bounce_styles_nest() {
        assert!(BounceFlags::GRENADE.contains(BounceFlags::CLASSIC));
        assert!(!BounceFlags::CLASSIC.contains(BounceFlags::WALLS));
    }
}
