use dehacked_data::values::{atoi, boom_state_number};
use dehacked_types::{FunctionSymbol, StateFlags, StateId};

use crate::engine::MbfParamState;
use crate::section::Patcher;

impl Patcher<'_> {
    /// Attach `symbol` to `state`, or clear its action. Routines that stand
    /// in for MBF codepointers are queued for parameter binding.
    fn set_pointer(&mut self, state: StateId, symbol: Option<FunctionSymbol>) {
        let record = self.world.state_mut(state);
        let Some(symbol) = symbol else {
            record.action = None;
            return;
        };
        record.action = Some(symbol.callable.clone());
        if let Some(alias) = self
            .engine
            .tables
            .aliases
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(symbol.name()))
        {
            self.engine
                .mbf_param_states
                .push(MbfParamState { state, alias });
        }
    }

    pub(crate) fn patch_pointer(&mut self, num: i32, rest: &str) {
        let conv_len = self.engine.tables.code_p_conv.len();
        let mut ptr_num = num;
        // Some Boom-era patches write `Pointer 0 (x <state>)`.
        if ptr_num == 0 {
            if let Some(state_number) = boom_state_number(rest) {
                ptr_num = self
                    .engine
                    .tables
                    .code_p_conv
                    .iter()
                    .position(|&conv| conv == state_number)
                    .unwrap_or(conv_len) as i32;
                log::debug!("Final ptrNum: {ptr_num}");
            }
        }
        let ptr_index = usize::try_from(ptr_num).ok().filter(|&p| p < conv_len);
        if ptr_index.is_none() {
            log::warn!("Pointer {ptr_num} out of range.");
        }

        while let Some((key, value)) = self.next_pair() {
            let Some(ptr_index) = ptr_index.filter(|_| key.eq_ignore_ascii_case("Codep Frame")) else {
                self.unknown_key(&key, "Pointer", ptr_num);
                continue;
            };
            let frame = self.engine.tables.code_p_conv[ptr_index];
            let Some(state) = self.engine.find_state(i64::from(frame)) else {
                log::warn!("Bad code pointer {ptr_num}");
                continue;
            };
            let index = atoi(&value);
            let symbol = usize::try_from(index)
                .ok()
                .and_then(|i| self.engine.tables.actions.get(i).cloned())
                .flatten();
            log::debug!("Hacked state for pointer num {ptr_num} with index {index}");
            self.set_pointer(state, symbol);
        }
    }

    pub(crate) fn patch_code_ptrs(&mut self) {
        log::debug!("[CodePtr]");
        while let Some((key, value)) = self.next_pair() {
            let is_frame_key = key.len() > 5
                && key.get(..5).is_some_and(|head| head.eq_ignore_ascii_case("Frame"))
                && key.as_bytes()[5].is_ascii_whitespace();
            if !is_frame_key {
                continue;
            }
            let frame = atoi(&key[5..]);
            let Some(state) = self.engine.find_state(i64::from(frame)) else {
                log::warn!("Frame {frame} out of range");
                continue;
            };
            if value.eq_ignore_ascii_case("NULL") {
                self.set_pointer(state, None);
                continue;
            }

            let mut symname = match value.get(..2) {
                Some(prefix) if prefix.eq_ignore_ascii_case("A_") => value.clone(),
                _ => format!("A_{value}"),
            };
            // Ammo use of A_ConsumeAmmo depends on its argument, so the
            // finalizer must not guess it from the routine.
            if symname.eq_ignore_ascii_case("A_ConsumeAmmo") {
                self.world.state_mut(state).flags |= StateFlags::CONSUME_AMMO;
            }

            let mut is_mbf = false;
            if let Some(alias) = self
                .engine
                .tables
                .aliases
                .iter()
                .find(|a| a.alias.eq_ignore_ascii_case(&symname))
            {
                log::debug!("{} --> {}", alias.alias, alias.name);
                symname = alias.name.clone();
                is_mbf = true;
            }

            let symbol = match self.world.find_function(&symname) {
                None => {
                    log::warn!("Frame {frame}: Unknown code pointer '{value}'");
                    continue;
                }
                // MBF routines take parameters that the binder fills in.
                Some(symbol) if !is_mbf && !symbol.callable_without_args() => {
                    log::warn!("Frame {frame}: Incompatible code pointer '{value}'");
                    continue;
                }
                Some(symbol) => symbol,
            };
            self.set_pointer(state, Some(symbol));
        }
    }
}
