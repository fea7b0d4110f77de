// src/noyau/modules.rs
//
// Descripteurs de modules : un nom + une fabrique de jetons.
// L’ordre de MODULES est l’ordre de chargement (le dernier gagne sur un nom commun).

pub mod base;
pub mod chem;
pub mod comb;
pub mod log;
pub mod si;
pub mod stats;
pub mod trig;
pub mod vec;

use super::decimal::Contexte;
use super::jetons::Jeton;
use super::reglages::{Reglages, PRECISION_MAX};

pub struct Module {
    pub nom: &'static str,
    pub jetons: fn(&Reglages) -> Vec<Jeton>,
}

pub const MODULES: &[Module] = &[
    Module { nom: "base", jetons: base::jetons },
    Module { nom: "trig", jetons: trig::jetons },
    Module { nom: "comb", jetons: comb::jetons },
    Module { nom: "log", jetons: log::jetons },
    Module { nom: "chem", jetons: chem::jetons },
    Module { nom: "si", jetons: si::jetons },
    Module { nom: "vec", jetons: vec::jetons },
    Module { nom: "stats", jetons: stats::jetons },
];

/// Précision des constantes du registre (arrondies à la lecture).
pub(crate) fn contexte_constantes() -> Contexte {
    Contexte::nouveau(PRECISION_MAX + 10)
}

/// Le jeton, suivi de copies sous d’autres noms.
pub(crate) fn avec_alias(jeton: Jeton, alias: &[&str]) -> Vec<Jeton> {
    let mut v: Vec<Jeton> = alias.iter().map(|a| jeton.renomme(a)).collect();
    v.insert(0, jeton);
    v
}
