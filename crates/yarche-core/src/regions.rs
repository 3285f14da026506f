/// A delivery region served by the chain, identified by a short code used in
/// export file names (`msk`) and displayed by its Russian name in CSV rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub code: &'static str,
    pub name: &'static str,
}

const REGIONS: &[Region] = &[
    Region { code: "ekb", name: "Екатеринбург" },
    Region { code: "msk", name: "Москва" },
    Region { code: "spb", name: "Санкт-Петербург" },
    Region { code: "kzn", name: "Казань" },
    Region { code: "rzn", name: "Рязань" },
    Region { code: "klg", name: "Калуга" },
    Region { code: "rnd", name: "Ростов-на-Дону" },
    Region { code: "nsb", name: "Новосибирск" },
    Region { code: "yar", name: "Ярославль" },
    Region { code: "nng", name: "Нижний Новгород" },
    Region { code: "krd", name: "Краснодар" },
    Region { code: "tvr", name: "Тверь" },
    Region { code: "tms", name: "Томск" },
    Region { code: "kng", name: "Калининград" },
];

impl Region {
    /// Looks up a region by its short code. Codes are matched case-sensitively.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Region> {
        REGIONS.iter().copied().find(|r| r.code == code)
    }

    /// All known regions in declaration order.
    #[must_use]
    pub fn all() -> &'static [Region] {
        REGIONS
    }
}

impl std::fmt::Display for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
