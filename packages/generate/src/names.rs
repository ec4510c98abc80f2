//! Given names and family names for generated people.

use pop_map_population_models::Sex;
use pop_map_random::RandomSource;

const FEMALE_FIRST_NAMES: &[&str] = &[
    "Alice", "Camille", "Chloé", "Claire", "Emma", "Inès", "Jade", "Julie", "Léa", "Louise",
    "Manon", "Margaux", "Marie", "Nathalie", "Sarah", "Sophie", "Zoé",
];

const MALE_FIRST_NAMES: &[&str] = &[
    "Adam", "Antoine", "Arthur", "Hugo", "Julien", "Karim", "Louis", "Lucas", "Mathis",
    "Maxime", "Nicolas", "Paul", "Pierre", "Raphaël", "Thomas", "Yanis",
];

const LAST_NAMES: &[&str] = &[
    "Bernard", "Bonnet", "Dubois", "Durand", "Fontaine", "Fournier", "Garcia", "Girard",
    "Lambert", "Laurent", "Lefebvre", "Leroy", "Martin", "Mercier", "Michel", "Moreau",
    "Petit", "Richard", "Robert", "Rousseau", "Simon", "Thomas",
];

/// Draws a given name for someone of the given sex.
pub fn first_name<R: RandomSource + ?Sized>(sex: Sex, rng: &mut R) -> &'static str {
    let names = match sex {
        Sex::Female => FEMALE_FIRST_NAMES,
        Sex::Male => MALE_FIRST_NAMES,
    };
    names[rng.index(names.len())]
}

/// Draws a family name; independent of sex.
pub fn last_name<R: RandomSource + ?Sized>(rng: &mut R) -> &'static str {
    LAST_NAMES[rng.index(LAST_NAMES.len())]
}
