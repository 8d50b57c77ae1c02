use crate::physics::Phase;

pub const RPORV: &str = "RPORV";
pub const PORV_MOD: &str = "PORV_MOD";
pub const PORV: &str = "PORV";
pub const PVTNUM: &str = "PVTNUM";

/// `FIPOIL`, `FIPGAS`, `FIPWAT`.
pub fn fip(phase: Phase) -> String {
    format!("FIP{}", phase.keyword_suffix())
}

/// `RFIPOIL`, `RFIPGAS`, `RFIPWAT`.
pub fn rfip(phase: Phase) -> String {
    format!("RFIP{}", phase.keyword_suffix())
}
