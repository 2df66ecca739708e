//! The one-shot admin notice shown after activation.

use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::modules::NOTICE_OPTION;
use crate::store::OptionStore;
use serde_json::Value;

pub fn dismiss<H: OptionStore>(host: &mut H) -> Result<CmdResult> {
    let mut result = CmdResult::default();
    if is_dismissed(host)? {
        result.add_message(CmdMessage::info("Notice already dismissed"));
        return Ok(result);
    }
    host.set_option(NOTICE_OPTION, Value::Bool(true))?;
    result.add_message(CmdMessage::success("Notice dismissed"));
    Ok(result)
}

pub fn is_dismissed<H: OptionStore>(host: &H) -> Result<bool> {
    Ok(matches!(host.get_option(NOTICE_OPTION)?, Some(Value::Bool(true))))
}
