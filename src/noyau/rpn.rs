// src/noyau/rpn.rs
//
// Shunting-yard -> RPN -> évaluation sur pile
// Règles:
// - opérande (arité 0) : sortie directe
// - ouvrant : empilé
// - fermant : dépile jusqu’à son ouvrant ; un ouvrant porteur d’une opération
//   (ex. '[' → tableau) sort comme fonction à un argument
// - opérateur / fonction / signe : dépile tant que le sommet n’est pas un ouvrant et que
//     gauche-droite : prec(jeton) <= prec(sommet)
//     droite-gauche : prec(jeton) <  prec(sommet)
//   puis s’empile
//
// Évaluation : chaque jeton consomme exactement `arite()` valeurs (ordre gauche → droite)
// et empile son résultat (plusieurs valeurs pour une opération éclatante).

use super::decimal::Contexte;
use super::erreur::{ErreurCalcul, ResultatCalcul};
use super::jetons::{Associativite, Genre, Jeton, Sortie};
use super::valeur::Valeur;

fn doit_depiler(jeton: &Jeton, sommet: &Jeton) -> bool {
    if sommet.genre().est_ouvrant() {
        return false;
    }
    match jeton.associativite() {
        Associativite::GaucheDroite => jeton.precedence() <= sommet.precedence(),
        Associativite::DroiteGauche => jeton.precedence() < sommet.precedence(),
    }
}

/// Convertit une suite de jetons (infixe complété) en RPN.
///
/// Exemple:
///   jetons: [2, *, (, 1, +, x, )]
///   rpn:    [2, 1, x, +, *]
pub fn to_rpn(jetons: Vec<Jeton>) -> ResultatCalcul<Vec<Jeton>> {
    let mut out: Vec<Jeton> = Vec::with_capacity(jetons.len());
    let mut ops: Vec<Jeton> = Vec::new();

    for jeton in jetons {
        let genre = jeton.genre();

        if genre.est_ouvrant() {
            ops.push(jeton);
            continue;
        }

        if genre.est_fermant() {
            // dépile jusqu’à l’ouvrant
            loop {
                match ops.pop() {
                    Some(top) if top.genre().est_ouvrant() => {
                        if let Some(f) = top.enveloppe() {
                            out.push(f);
                        }
                        break;
                    }
                    Some(top) => out.push(top),
                    None => return Err(ErreurCalcul::CrochetNonOuvert(jeton.nom().into())),
                }
            }
            continue;
        }

        if genre.arite() == 0 {
            out.push(jeton);
            continue;
        }

        while let Some(top) = ops.last() {
            if !doit_depiler(&jeton, top) {
                break;
            }
            if let Some(top) = ops.pop() {
                out.push(top);
            }
        }
        ops.push(jeton);
    }

    // vide la pile ops
    while let Some(op) = ops.pop() {
        if op.genre().est_ouvrant() {
            return Err(ErreurCalcul::CrochetNonFerme(op.nom().into()));
        }
        out.push(op);
    }

    Ok(out)
}

/// Évalue une RPN ; rend la pile finale (une seule valeur attendue, voir `reponse_unique`).
pub fn evaluer(rpn: &[Jeton], ctx: Contexte) -> ResultatCalcul<Vec<Valeur>> {
    let mut pile: Vec<Valeur> = Vec::new();

    for jeton in rpn {
        let n = jeton.arite();
        if pile.len() < n {
            return Err(ErreurCalcul::OperandesManquantes(jeton.nom().trim().into()));
        }
        let args = pile.split_off(pile.len() - n);

        match jeton.appliquer(args, ctx)? {
            Sortie::Une(v) => pile.push(v),
            Sortie::Plusieurs(vs) => pile.extend(vs),
        }
    }

    Ok(pile)
}

/// Exactement une valeur en fin de calcul.
pub fn reponse_unique(mut pile: Vec<Valeur>) -> ResultatCalcul<Valeur> {
    match pile.len() {
        1 => pile.pop().ok_or(ErreurCalcul::PileIncorrecte(0)),
        n => Err(ErreurCalcul::PileIncorrecte(n)),
    }
}

/// Noms en RPN (traces / tests).
pub fn format_rpn(rpn: &[Jeton]) -> String {
    rpn.iter()
        .map(|j| match j.genre() {
            Genre::Double => j.nom().replace(' ', ""),
            _ => j.nom().trim().to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
