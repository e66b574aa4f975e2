use dehacked_data::values::int_prefix;
use dehacked_types::{MbfArgs, StateFlags, StateRecord};

use crate::bits::mbf21_state_bits;
use crate::section::Patcher;

const FULLBRIGHT_BIT: i32 = 0x8000;

impl Patcher<'_> {
    pub(crate) fn patch_frame(&mut self, frame_num: i32) {
        let state = self.engine.find_state(i64::from(frame_num));
        let mut info = match state {
            Some(id) => self.world.state(id).clone(),
            None => {
                log::warn!("Frame {frame_num} out of range");
                StateRecord::default()
            }
        };
        let mut tics = match (state, frame_num) {
            (None, _) => 0,
            // The super shotgun flash kept its original timing.
            (Some(_), 47) => 5,
            (Some(_), 48) => 4,
            (Some(_), _) => info.tics,
        };
        let mut misc1 = info.misc1;
        let mut frame = i32::from(info.frame);
        if info.flags.contains(StateFlags::FULLBRIGHT) {
            frame |= FULLBRIGHT_BIT;
        }
        if state.is_none() {
            misc1 = 0;
            frame = 0;
        }
        let mut args = MbfArgs::default();

        while let Some((key, value)) = self.next_pair() {
            let val64 = int_prefix(&value).0;
            let val = val64 as i32;

            match key.to_ascii_lowercase().as_str() {
                "duration" => tics = val.clamp(-1, i32::from(i16::MAX)),
                "unknown 1" => misc1 = val,
                "unknown 2" => info.misc2 = val,
                "sprite number" => self.frame_sprite(frame_num, &mut info, val),
                "next frame" => {
                    info.next = self.engine.find_state(val64);
                    self.engine.changed_states = true;
                }
                "sprite subnumber" => frame = val,
                "mbf21 bits" => {
                    if let Some(flags) = mbf21_state_bits(&value) {
                        info.flags = (info.flags - StateFlags::SKILL5FAST) | flags;
                    }
                    log::debug!("MBF21 Bits: {} (0x{:08x})", info.flags.bits(), info.flags.bits());
                }
                lower if lower.len() == 5 && lower.starts_with("args") => {
                    let arg = i32::from(lower.as_bytes()[4]) - i32::from(b'1');
                    match usize::try_from(arg).ok().filter(|&a| a < 8) {
                        Some(arg) => args.set(arg, val64),
                        None => log::warn!("Invalid frame arg {arg}"),
                    }
                }
                _ => self.unknown_key(&key, "Frame", frame_num),
            }
        }

        let Some(id) = state else {
            return;
        };
        info.flags |= StateFlags::DEHACKED;
        if !(0..=63).contains(&(frame & 0x7fff)) {
            log::warn!("Frame {frame_num}: Subnumber must be in range [0,63]");
        }
        info.tics = tics;
        info.misc1 = misc1;
        info.frame = (frame & 0x3f) as u8;
        info.flags.set(StateFlags::FULLBRIGHT, frame & FULLBRIGHT_BIT != 0);
        *self.world.state_mut(id) = info;
        self.engine.state_args.insert(id, args);
    }

    fn frame_sprite(&mut self, frame_num: i32, info: &mut StateRecord, val: i32) {
        let org = usize::try_from(val)
            .ok()
            .and_then(|i| self.engine.tables.org_spr_names.get(i).copied());
        let Some(org) = org else {
            log::warn!("Frame {frame_num}: Sprite {val} out of range");
            return;
        };
        match self.world.sprite_names().iter().position(|s| *s == org) {
            Some(index) => info.sprite = index,
            None => log::warn!("Frame {frame_num}: Sprite {val} ({org}) is undefined"),
        }
    }
}
