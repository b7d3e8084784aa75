//! Issuing banks known to the detector chain.

use std::fmt;

use serde::{Deserialize, Serialize};

/// An issuing bank (or payment institution) with its own receipt layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Issuer {
    Ziraat,
    ZiraatKatilim,
    YapiKredi,
    Akbank,
    DenizBank,
    Enpara,
    Garanti,
    VakifBank,
    VakifKatilim,
    Teb,
    KuveytTurk,
    Ing,
    TurkiyeFinans,
    Isbank,
    Halkbank,
    Qnb,
    PttBank,
    TomBank,
    Albaraka,
    Fibabanka,
    Upt,
}

impl Issuer {
    pub const ALL: [Issuer; 21] = [
        Issuer::Ziraat,
        Issuer::ZiraatKatilim,
        Issuer::YapiKredi,
        Issuer::Akbank,
        Issuer::DenizBank,
        Issuer::Enpara,
        Issuer::Garanti,
        Issuer::VakifBank,
        Issuer::VakifKatilim,
        Issuer::Teb,
        Issuer::KuveytTurk,
        Issuer::Ing,
        Issuer::TurkiyeFinans,
        Issuer::Isbank,
        Issuer::Halkbank,
        Issuer::Qnb,
        Issuer::PttBank,
        Issuer::TomBank,
        Issuer::Albaraka,
        Issuer::Fibabanka,
        Issuer::Upt,
    ];

    /// Display name used in classification results.
    pub fn name(self) -> &'static str {
        match self {
            Issuer::Ziraat => "Ziraat",
            Issuer::ZiraatKatilim => "ZiraatKatilim",
            Issuer::YapiKredi => "YapiKredi",
            Issuer::Akbank => "Akbank",
            Issuer::DenizBank => "DenizBank",
            Issuer::Enpara => "Enpara",
            Issuer::Garanti => "Garanti",
            Issuer::VakifBank => "VakifBank",
            Issuer::VakifKatilim => "VakifKatilim",
            Issuer::Teb => "TEB",
            Issuer::KuveytTurk => "KuveytTurk",
            Issuer::Ing => "ING",
            Issuer::TurkiyeFinans => "TurkiyeFinans",
            Issuer::Isbank => "TurkiyeIsBankasi",
            Issuer::Halkbank => "Halkbank",
            Issuer::Qnb => "QNB",
            Issuer::PttBank => "PttBank",
            Issuer::TomBank => "TOM Bank",
            Issuer::Albaraka => "Albaraka",
            Issuer::Fibabanka => "Fibabanka",
            Issuer::Upt => "UPT",
        }
    }
}

impl fmt::Display for Issuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
