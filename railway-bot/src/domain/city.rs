//! Static city directory.
//!
//! Maps the cities served by the railway to their station codes. The table
//! is fixed at compile time; lookups never allocate.

use super::StationCode;

/// A city with a railway station.
#[derive(Debug, PartialEq, Eq)]
pub struct City {
    /// Uzbek name, shown on buttons and prompts.
    pub display_name: &'static str,
    /// Russian name, used in result headers.
    pub name_ru: &'static str,
    /// English name.
    pub name_en: &'static str,
    /// Station code understood by the availability API.
    pub station_code: StationCode,
}

const fn city(
    display_name: &'static str,
    name_ru: &'static str,
    name_en: &'static str,
    code: &'static str,
) -> City {
    City {
        display_name,
        name_ru,
        name_en,
        station_code: StationCode::from_static(code),
    }
}

/// All cities offered to the user, in menu order.
pub static CITIES: [City; 16] = [
    city("Toshkent", "Ташкент", "Tashkent", "2900000"),
    city("Samarqand", "Самарканд", "Samarkand", "2900700"),
    city("Buxoro", "Бухара", "Bukhara", "2900800"),
    city("Xiva", "Хива", "Khiva", "2900172"),
    city("Urganch", "Ургенч", "Urgench", "2900790"),
    city("Nukus", "Нукус", "Nukus", "2900970"),
    city("Navoiy", "Навои", "Navoi", "2900930"),
    city("Andijon", "Андижан", "Andijan", "2900680"),
    city("Qarshi", "Карши", "Karshi", "2900750"),
    city("Jizzax", "Джизак", "Jizzakh", "2900720"),
    city("Termiz", "Термез", "Termez", "2900255"),
    city("Guliston", "Гулистан", "Gulistan", "2900850"),
    city("Qo'qon", "Коканд", "Qo'qon", "2900880"),
    city("Margilon", "Маргилан", "Margilon", "2900920"),
    city("Pop", "Пап", "Pop", "2900693"),
    city("Namangan", "Наманган", "Namangan", "2900940"),
];

/// Read-only view over the city table.
///
/// Cheap to copy; every `City` it hands out is `'static`.
#[derive(Debug, Clone, Copy)]
pub struct CityDirectory {
    cities: &'static [City],
}

impl CityDirectory {
    /// The built-in directory of Uzbek railway cities.
    pub fn builtin() -> Self {
        Self { cities: &CITIES }
    }

    /// All cities in menu order.
    pub fn all(&self) -> impl Iterator<Item = &'static City> + '_ {
        self.cities.iter()
    }

    /// All cities except the one with `excluded` as its station code.
    pub fn all_except(&self, excluded: StationCode) -> impl Iterator<Item = &'static City> + '_ {
        self.all().filter(move |c| c.station_code != excluded)
    }

    /// Look up a city by station code.
    pub fn by_code(&self, code: StationCode) -> Option<&'static City> {
        self.cities.iter().find(|c| c.station_code == code)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }
}

impl Default for CityDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}
