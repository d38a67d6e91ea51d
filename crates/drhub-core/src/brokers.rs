//! Issuing-broker reference data.
//!
//! Static table keyed by the issuer codes the classifier derives from DR
//! symbol suffixes. Read-only; the pipeline never mutates it.

use serde::Serialize;

use crate::snapshot::Snapshot;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Broker {
    pub id: &'static str,
    /// Thai short name, e.g. "บล.บัวหลวง".
    pub name: &'static str,
    pub full_name: &'static str,
    pub commission: &'static str,
    pub min_trade: &'static str,
    pub website: &'static str,
    pub logo: &'static str,
}

/// A broker together with how many listed DRs it issues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrokerListing {
    #[serde(flatten)]
    pub broker: Broker,
    pub dr_count: usize,
}

pub const BROKERS: &[Broker] = &[
    Broker {
        id: "KTB",
        name: "ธ.กรุงไทย",
        full_name: "ธนาคารกรุงไทย จำกัด (มหาชน)",
        commission: "0.15%",
        min_trade: "1 หน่วย",
        website: "https://www.krungthai.com",
        logo: "🔵",
    },
    Broker {
        id: "BLS",
        name: "บล.บัวหลวง",
        full_name: "บริษัทหลักทรัพย์ บัวหลวง จำกัด (มหาชน)",
        commission: "0.15%",
        min_trade: "1 หน่วย",
        website: "https://www.bualuang.co.th",
        logo: "🏦",
    },
    Broker {
        id: "YUANTA",
        name: "บล.หยวนต้า",
        full_name: "บริษัทหลักทรัพย์ หยวนต้า (ประเทศไทย) จำกัด",
        commission: "0.15%",
        min_trade: "1 หน่วย",
        website: "https://www.yuanta.co.th",
        logo: "🔶",
    },
    Broker {
        id: "KGI",
        name: "บล.เคจีไอ",
        full_name: "บริษัทหลักทรัพย์ เคจีไอ (ประเทศไทย) จำกัด (มหาชน)",
        commission: "0.15%",
        min_trade: "1 หน่วย",
        website: "https://www.kgieworld.co.th",
        logo: "🟢",
    },
    Broker {
        id: "KKP",
        name: "บล.เกียรตินาคินภัทร",
        full_name: "บริษัทหลักทรัพย์ เกียรตินาคินภัทร จำกัด (มหาชน)",
        commission: "0.15%",
        min_trade: "1 หน่วย",
        website: "https://www.kkpfg.com",
        logo: "🟡",
    },
    Broker {
        id: "FSS",
        name: "บล.ฟินันเซีย ไซรัส",
        full_name: "บริษัทหลักทรัพย์ ฟินันเซีย ไซรัส จำกัด (มหาชน)",
        commission: "0.15%",
        min_trade: "1 หน่วย",
        website: "https://www.fnsyrus.com",
        logo: "🟠",
    },
    Broker {
        id: "PI",
        name: "บล.พาย",
        full_name: "บริษัทหลักทรัพย์ พาย จำกัด (มหาชน)",
        commission: "0.12%",
        min_trade: "1 หน่วย",
        website: "https://www.pi.co.th",
        logo: "🟣",
    },
    Broker {
        id: "INVX",
        name: "บล.อินโนเวสท์ เอกซ์",
        full_name: "บริษัทหลักทรัพย์ อินโนเวสท์ เอกซ์ จำกัด",
        commission: "0.15%",
        min_trade: "1 หน่วย",
        website: "https://www.innovestx.co.th",
        logo: "🔷",
    },
];

pub fn broker_by_id(id: &str) -> Option<&'static Broker> {
    let needle = id.trim().to_ascii_uppercase();
    BROKERS.iter().find(|broker| broker.id == needle)
}

/// The broker table augmented with per-issuer DR counts from a snapshot.
pub fn with_dr_counts(snapshot: &Snapshot) -> Vec<BrokerListing> {
    BROKERS
        .iter()
        .map(|broker| BrokerListing {
            broker: broker.clone(),
            dr_count: snapshot
                .records
                .iter()
                .filter(|record| record.issuer_code == broker.id)
                .count(),
        })
        .collect()
}
