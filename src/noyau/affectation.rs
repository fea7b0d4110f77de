// src/noyau/affectation.rs
//
// Cible d’une instruction :
// - `x = expr`    → x (nom frais ou variable utilisateur, jamais un nom du registre)
// - `x op = expr` → x (doit exister) ; les mots deviennent `x op expr` (le `=` seul disparaît)
// - sinon         → variable réponse (ans)

use super::decoupage::est_lettre;
use super::environnement::{Environnement, NOM_SYSTEME};
use super::erreur::{ErreurCalcul, ResultatCalcul};
use super::registre::Registre;
use super::reglages::AFFECTATION;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Affectation {
    /// Variable qui recevra le résultat.
    pub cible: String,
    /// Mots restant à évaluer.
    pub mots: Vec<String>,
}

pub fn resoudre(
    mots: Vec<String>,
    registre: &Registre,
    env: &Environnement,
    nom_reponse: &str,
) -> ResultatCalcul<Affectation> {
    // x = expr
    if mots.len() > 2 && mots[1] == AFFECTATION {
        let cible = &mots[0];
        let valide = cible.starts_with(est_lettre)
            && cible != NOM_SYSTEME
            && !registre.contient(cible);
        if !valide {
            return Err(ErreurCalcul::Affectation(cible.clone()));
        }
        return Ok(Affectation {
            cible: cible.clone(),
            mots: mots[2..].to_vec(),
        });
    }

    // x op = expr
    if mots.len() > 2 && mots[2] == AFFECTATION {
        let cible = &mots[0];
        if !env.contient(cible) || cible == NOM_SYSTEME {
            return Err(ErreurCalcul::AffectationComposee(cible.clone()));
        }

        let mut reste = Vec::with_capacity(mots.len() - 1);
        reste.extend_from_slice(&mots[..2]);
        reste.extend_from_slice(&mots[3..]);

        return Ok(Affectation {
            cible: cible.clone(),
            mots: reste,
        });
    }

    Ok(Affectation {
        cible: nom_reponse.to_string(),
        mots,
    })
}
