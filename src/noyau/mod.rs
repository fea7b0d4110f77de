//! Noyau de la calculatrice
//!
//! Organisation interne (une étape du pipeline par fichier) :
//! - decoupage.rs     : entrée → instructions → mots
//! - affectation.rs   : cible de l’instruction (x = …, x op= …, ans)
//! - jetons.rs        : modèle des jetons + tokenisation
//! - completion.rs    : signes, multiplication implicite, fusions "f ^"
//! - rpn.rs           : shunting-yard + évaluation sur pile
//! - verification.rs  : double évaluation (précision réduite)
//! - eval.rs          : façade `Calculatrice`
//!
//! Arithmétique : decimal.rs (virgule fixe arrondie), analyse.rs (fonctions
//! transcendantes), quantite.rs (unités), valeur.rs (valeurs et opérations).
//! Registre : modules.rs (descripteurs) + modules/*.rs, registre.rs.

pub mod affectation;
pub mod analyse;
pub mod completion;
pub mod decimal;
pub mod decoupage;
pub mod environnement;
pub mod erreur;
pub mod eval;
pub mod format;
pub mod jetons;
pub mod modules;
pub mod quantite;
pub mod registre;
pub mod reglages;
pub mod rpn;
pub mod valeur;
pub mod verification;

#[cfg(test)]
mod tests_scientifiques;

#[cfg(test)]
mod tests_fuzz_safe;

// API publique minimale
pub use eval::Calculatrice;
pub use reglages::Reglages;
