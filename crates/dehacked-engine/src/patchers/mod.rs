//! One handler per patch section, each an `impl` block on
//! [`Patcher`](crate::section::Patcher).

mod ammo;
mod frame;
mod include;
mod misc;
mod pointer;
mod sprite;
mod strings;
mod text;
mod thing;
mod weapon;
