// src/noyau/verification.rs
//
// Double évaluation : précision p (résultat a), puis précision réduite (résultat i).
// Pour chaque nombre du résultat : a est gardé si a = 0 ou 0.5 < i/a < 2, sinon remplacé
// par 0 (calcul instable : perte de chiffres significatifs).
// Un seul niveau de structure est parcouru (éléments d’un vecteur / tableau, valeur d’une quantité).

use super::decimal::{Contexte, Decimal};
use super::erreur::ResultatCalcul;
use super::jetons::Jeton;
use super::rpn::{evaluer, reponse_unique};
use super::valeur::Valeur;

fn stable(a: &Decimal, i: &Decimal, ctx: Contexte) -> bool {
    if a.est_zero() {
        return true;
    }
    match i.div(a, ctx) {
        Ok(rapport) => rapport > Decimal::demi() && rapport < Decimal::from(2),
        Err(_) => false,
    }
}

fn feuille(a: &Decimal, i: &Decimal, ctx: Contexte) -> Decimal {
    if stable(a, i, ctx) {
        a.clone()
    } else {
        Decimal::zero()
    }
}

/// Règle appliquée à une valeur non structurée.
fn comparer_scalaire(a: Valeur, i: &Valeur, ctx: Contexte) -> Valeur {
    match (a, i) {
        (Valeur::Nombre(a), Valeur::Nombre(i)) => Valeur::Nombre(feuille(&a, i, ctx)),
        (Valeur::Quantite(a), Valeur::Quantite(i)) => {
            let v = feuille(&a.valeur, &i.valeur, ctx);
            Valeur::Quantite(a.avec_valeur(v))
        }
        (a, _) => a,
    }
}

/// Compare le résultat précis `a` au résultat imprécis `i`.
pub fn filtrer(a: Valeur, i: &Valeur, ctx: Contexte) -> Valeur {
    match (a, i) {
        (Valeur::Vecteur(x), Valeur::Vecteur(y)) if x.len() == y.len() => Valeur::vecteur(
            x.iter()
                .zip(y.iter())
                .map(|(e, f)| comparer_scalaire(e.clone(), f, ctx))
                .collect(),
        ),
        (Valeur::Tableau(x), Valeur::Tableau(y)) if x.len() == y.len() => Valeur::tableau(
            x.iter()
                .zip(y.iter())
                .map(|(e, f)| comparer_scalaire(e.clone(), f, ctx))
                .collect(),
        ),
        (a, i) => comparer_scalaire(a, i, ctx),
    }
}

/// Évalue la RPN aux deux précisions et rend le résultat filtré.
/// Une erreur à la précision réduite seule laisse le résultat précis intact.
pub fn evaluer_verifie(rpn: &[Jeton], ctx: Contexte, ctx_reduit: Contexte) -> ResultatCalcul<Valeur> {
    let a = reponse_unique(evaluer(rpn, ctx)?)?;

    let i = match evaluer(rpn, ctx_reduit).and_then(reponse_unique) {
        Ok(i) => i,
        Err(err) => {
            tracing::debug!(erreur = %err, "évaluation réduite impossible, résultat gardé");
            return Ok(a);
        }
    };

    tracing::debug!(precis = ?a, reduit = ?i, "double évaluation");
    Ok(filtrer(a, &i, ctx))
}
