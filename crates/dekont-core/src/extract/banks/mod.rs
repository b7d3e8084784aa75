//! Per-issuer receipt layouts.

pub mod akbank;
pub mod albaraka;
pub mod denizbank;
pub mod enpara;
pub mod fibabanka;
pub mod garanti;
pub mod halkbank;
pub mod ing;
pub mod isbank;
pub mod kuveytturk;
pub mod pttbank;
pub mod qnb;
pub mod teb;
pub mod tombank;
pub mod turkiye_finans;
pub mod upt;
pub mod vakif_katilim;
pub mod vakifbank;
pub mod yapikredi;
pub mod ziraat;
pub mod ziraat_katilim;
