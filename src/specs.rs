//! 클래스/특성 메타데이터
//!
//! 0..40 범위의 특성 인덱스를 (클래스, 특성 이름, 아이콘)과 URL용 slug로 매핑합니다.
//! 인덱스 / 4 가 클래스를 고르고, 각 클래스의 첫 슬롯은 특성이 아닌 클래스 자리입니다.

use serde::Serialize;

/// 전체 특성 슬롯 수
pub const SPEC_COUNT: usize = 40;
/// 클래스당 슬롯 수 (클래스 자리 1 + 특성 3)
pub const SLOTS_PER_CLASS: usize = 4;
/// 클래스 자리 외에 집계에서 빠지는 슬롯 (탱커/힐러)
pub const IGNORED_SPEC_SLOTS: [usize; 7] = [7, 17, 18, 21, 22, 31, 39];

pub const CLASSES: [&str; 10] = [
    "Death Knight",
    "Druid",
    "Hunter",
    "Mage",
    "Paladin",
    "Priest",
    "Rogue",
    "Shaman",
    "Warlock",
    "Warrior",
];

lazy_static::lazy_static! {
    /// 특성 인덱스 -> (특성 이름, 아이콘)
    ///
    /// 클래스 자리는 클래스 이름과 클래스 아이콘을 그대로 씁니다.
    pub static ref SPECS_LIST: Vec<(&'static str, &'static str)> = {
        let mut v: Vec<(&'static str, &'static str)> = Vec::with_capacity(SPEC_COUNT);

        let mut class = |name: &'static str, icon: &'static str, specs: [(&'static str, &'static str); 3]| {
            v.push((name, icon));
            v.extend(specs);
        };

        class("Death Knight", "classicon_deathknight", [
            ("Blood", "spell_deathknight_bloodpresence"),
            ("Frost", "spell_deathknight_frostpresence"),
            ("Unholy", "spell_deathknight_unholypresence"),
        ]);
        class("Druid", "classicon_druid", [
            ("Balance", "spell_nature_starfall"),
            ("Feral Combat", "ability_racial_bearform"),
            ("Restoration", "spell_nature_healingtouch"),
        ]);
        class("Hunter", "classicon_hunter", [
            ("Beast Mastery", "ability_hunter_beasttaming"),
            ("Marksmanship", "ability_marksmanship"),
            ("Survival", "ability_hunter_swiftstrike"),
        ]);
        class("Mage", "classicon_mage", [
            ("Arcane", "spell_holy_magicalsentry"),
            ("Fire", "spell_fire_firebolt02"),
            ("Frost", "spell_frost_frostbolt02"),
        ]);
        class("Paladin", "classicon_paladin", [
            ("Holy", "spell_holy_holybolt"),
            ("Protection", "spell_holy_devotionaura"),
            ("Retribution", "spell_holy_auraoflight"),
        ]);
        class("Priest", "classicon_priest", [
            ("Discipline", "spell_holy_wordfortitude"),
            ("Holy", "spell_holy_guardianspirit"),
            ("Shadow", "spell_shadow_shadowwordpain"),
        ]);
        class("Rogue", "classicon_rogue", [
            ("Assassination", "ability_rogue_eviscerate"),
            ("Combat", "ability_backstab"),
            ("Subtlety", "ability_stealth"),
        ]);
        class("Shaman", "classicon_shaman", [
            ("Elemental", "spell_nature_lightning"),
            ("Enhancement", "spell_nature_lightningshield"),
            ("Restoration", "spell_nature_magicimmunity"),
        ]);
        class("Warlock", "classicon_warlock", [
            ("Affliction", "spell_shadow_deathcoil"),
            ("Demonology", "spell_shadow_metamorphosis"),
            ("Destruction", "spell_shadow_rainoffire"),
        ]);
        class("Warrior", "classicon_warrior", [
            ("Arms", "ability_warrior_savageblow"),
            ("Fury", "ability_warrior_innerrage"),
            ("Protection", "ability_warrior_defensivestance"),
        ]);

        v
    };
}

/// "Death Knight" -> "death-knight"
pub fn to_slug(name: &str) -> String {
    name.replace(' ', "-").to_lowercase()
}

/// 집계 대상 특성인지 확인 (범위 밖, 클래스 자리, 제외 목록이면 false)
pub fn is_playable_spec(index: usize) -> bool {
    index < SPEC_COUNT && index % SLOTS_PER_CLASS != 0 && !IGNORED_SPEC_SLOTS.contains(&index)
}

/// 특성 하나의 메타데이터
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecMetadata {
    pub index: usize,
    pub class_name: &'static str,
    pub spec_name: &'static str,
    pub icon: &'static str,
    pub class_slug: String,
    /// 리포트의 키로 쓰이는 `class-spec` 형식 (예: "death-knight-frost")
    pub spec_slug: String,
}

/// 렌더링 레이어로 넘기는 특성 정보
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SpecData {
    pub class_name: &'static str,
    pub class_html: String,
    pub spec_name: &'static str,
    pub spec_html: String,
    pub icon: &'static str,
}

impl From<&SpecMetadata> for SpecData {
    fn from(meta: &SpecMetadata) -> Self {
        Self {
            class_name: meta.class_name,
            class_html: meta.class_slug.clone(),
            spec_name: meta.spec_name,
            spec_html: meta.spec_slug.clone(),
            icon: meta.icon,
        }
    }
}

/// 40개 슬롯 전체의 메타데이터. 프로세스 시작 시 한 번 만들어 공유합니다.
#[derive(Debug, Clone)]
pub struct SpecCatalog {
    specs: Vec<SpecMetadata>,
}

impl SpecCatalog {
    pub fn new() -> Self {
        let specs = SPECS_LIST
            .iter()
            .enumerate()
            .map(|(index, &(spec_name, icon))| {
                let class_name = CLASSES[index / SLOTS_PER_CLASS];
                SpecMetadata {
                    index,
                    class_name,
                    spec_name,
                    icon,
                    class_slug: to_slug(class_name),
                    spec_slug: to_slug(&format!("{} {}", class_name, spec_name)),
                }
            })
            .collect();

        Self { specs }
    }

    pub fn get(&self, index: usize) -> Option<&SpecMetadata> {
        self.specs.get(index)
    }

    pub fn slug(&self, index: usize) -> Option<&str> {
        self.get(index).map(|meta| meta.spec_slug.as_str())
    }

    pub fn is_valid(&self, index: usize) -> bool {
        index < self.specs.len() && is_playable_spec(index)
    }

    /// 집계 대상 특성만 인덱스 순으로
    pub fn valid_specs(&self) -> impl Iterator<Item = &SpecMetadata> + '_ {
        self.specs.iter().filter(|meta| is_playable_spec(meta.index))
    }

    pub fn specs_data(&self) -> Vec<SpecData> {
        self.valid_specs().map(SpecData::from).collect()
    }
}

impl Default for SpecCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_covers_every_slot() {
        let catalog = SpecCatalog::new();
        assert_eq!(SPECS_LIST.len(), SPEC_COUNT);
        for index in 0..SPEC_COUNT {
            assert_eq!(catalog.get(index).unwrap().index, index);
        }
        assert!(catalog.get(SPEC_COUNT).is_none());
    }

    #[test]
    fn test_slugs() {
        let catalog = SpecCatalog::new();
        assert_eq!(catalog.slug(3), Some("death-knight-unholy"));
        assert_eq!(catalog.slug(6), Some("druid-feral-combat"));
        assert_eq!(catalog.slug(9), Some("hunter-beast-mastery"));
        assert_eq!(catalog.get(9).unwrap().class_slug, "hunter");
    }

    #[test]
    fn test_slugs_are_unique() {
        let catalog = SpecCatalog::new();
        let slugs: HashSet<&str> = (0..SPEC_COUNT).filter_map(|i| catalog.slug(i)).collect();
        assert_eq!(slugs.len(), SPEC_COUNT);
    }

    #[test]
    fn test_validity() {
        let catalog = SpecCatalog::new();
        for index in (0..SPEC_COUNT).step_by(SLOTS_PER_CLASS) {
            assert!(!catalog.is_valid(index), "class slot {} must be invalid", index);
        }
        for index in IGNORED_SPEC_SLOTS {
            assert!(!catalog.is_valid(index));
        }
        assert!(catalog.is_valid(1));
        assert!(catalog.is_valid(38));
        assert!(!catalog.is_valid(40));
        assert!(!catalog.is_valid(usize::MAX));

        // 10 클래스 자리 + 7 제외 슬롯
        assert_eq!(catalog.valid_specs().count(), SPEC_COUNT - 10 - IGNORED_SPEC_SLOTS.len());
    }

    #[test]
    fn test_specs_data() {
        let data = SpecCatalog::new().specs_data();
        let first = &data[0];
        assert_eq!(first.class_name, "Death Knight");
        assert_eq!(first.class_html, "death-knight");
        assert_eq!(first.spec_html, "death-knight-blood");
        assert_eq!(first.icon, "spell_deathknight_bloodpresence");
        assert!(data.iter().all(|d| d.spec_html != "druid-restoration"));
    }
}
