use dehacked_data::values::atoi;
use dehacked_types::ClassId;

use crate::section::Patcher;

/// `value * num / den` in 64-bit, saturated to `i32`.
fn scale(value: i32, num: i32, den: i32) -> i32 {
    if den == 0 {
        return value;
    }
    let scaled = i64::from(value) * i64::from(num) / i64::from(den);
    scaled.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

impl Patcher<'_> {
    pub(crate) fn patch_ammo(&mut self, ammo_num: i32) {
        let ammo_type = usize::try_from(ammo_num)
            .ok()
            .filter(|&n| n < 4)
            .and_then(|n| self.engine.tables.ammo_names.get(n).copied().flatten());
        if ammo_type.is_none() {
            log::warn!("Ammo {ammo_num} out of range.");
        }

        let (mut max, mut per) = match ammo_type {
            Some(class) => {
                let inv = &self.world.defaults(class).inventory;
                (inv.max_amount, inv.amount)
            }
            None => (0, 0),
        };
        let old_per = per;

        while let Some((key, value)) = self.next_pair() {
            if key.eq_ignore_ascii_case("Max ammo") {
                max = atoi(&value);
            } else if key.eq_ignore_ascii_case("Per ammo") {
                per = atoi(&value);
            } else {
                self.unknown_key(&key, "Ammo", ammo_num);
            }
        }

        let Some(ammo_type) = ammo_type else {
            return;
        };
        let inv = &mut self.world.defaults_mut(ammo_type).inventory;
        inv.max_amount = max;
        inv.amount = per;
        inv.backpack_max_amount = max * 2;
        inv.backpack_amount = per;

        if per != old_per {
            self.rescale_ammo(ammo_type, max, per, old_per);
        }
    }

    /// Carry a changed per-pickup amount over to subclasses of the ammo and
    /// to every weapon that hands it out.
    fn rescale_ammo(&mut self, ammo_type: ClassId, max: i32, per: i32, old_per: i32) {
        if old_per == 0 {
            log::warn!("Ammo {} had no per-pickup amount; not rescaling", self.world.class_name(ammo_type));
        }
        let weapon = self.world.find_class("Weapon");
        for class in self.world.all_classes() {
            if class == ammo_type {
                continue;
            }
            if self.world.is_descendant_of(class, ammo_type) {
                let inv = &mut self.world.defaults_mut(class).inventory;
                inv.max_amount = max;
                inv.amount = scale(inv.amount, per, old_per);
            } else if weapon.is_some_and(|w| self.world.is_descendant_of(class, w)) {
                let props = &mut self.world.defaults_mut(class).weapon;
                if props.ammo_type1 == Some(ammo_type) {
                    props.ammo_give1 = scale(props.ammo_give1, per, old_per);
                }
                if props.ammo_type2 == Some(ammo_type) {
                    props.ammo_give2 = scale(props.ammo_give2, per, old_per);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::scale;

    #[test]
    fn scale_is_proportional() {
        assert_eq!(scale(7, 14, 7), 14);
        assert_eq!(scale(20, 5, 10), 10);
        assert_eq!(scale(5, 3, 0), 5);
    }
}
