// src/noyau/modules/stats.rs
//
// Statistiques sur un tableau (ou un vecteur) : SUM LEN SORT MEAN MEDIAN VARIANCE DEVIATION.

use std::cmp::Ordering;

use crate::noyau::decimal::Contexte;
use crate::noyau::erreur::{ErreurArith, ResultatArith};
use crate::noyau::jetons::{Jeton, PREC_IMPLICITE};
use crate::noyau::reglages::Reglages;
use crate::noyau::valeur::Valeur;

use super::base::racine;
use super::vec::crochets;

fn echantillon<'a>(v: &'a Valeur, nom: &'static str) -> ResultatArith<&'a [Valeur]> {
    match v {
        Valeur::NomInconnu(n) => Err(ErreurArith::NomInconnu(n.clone())),
        _ => v.elements().ok_or(ErreurArith::TypeInvalide(nom, v.genre())),
    }
}

fn non_vide<'a>(v: &'a Valeur, nom: &'static str) -> ResultatArith<&'a [Valeur]> {
    let e = echantillon(v, nom)?;
    if e.is_empty() {
        return Err(ErreurArith::Domaine(format!("{nom} d’un tableau vide")));
    }
    Ok(e)
}

fn total(e: &[Valeur], ctx: Contexte) -> ResultatArith<Valeur> {
    let mut it = e.iter().cloned();
    let Some(premier) = it.next() else {
        return Ok(Valeur::entier(0));
    };
    it.try_fold(premier, |acc, x| acc.additionner(x, ctx))
}

fn trie(e: &[Valeur]) -> ResultatArith<Vec<Valeur>> {
    let mut v = e.to_vec();
    let mut erreur = None;
    v.sort_by(|a, b| {
        a.comparer(b).unwrap_or_else(|err| {
            erreur.get_or_insert(err);
            Ordering::Equal
        })
    });
    match erreur {
        Some(err) => Err(err),
        None => Ok(v),
    }
}

fn moyenne_de(e: &[Valeur], ctx: Contexte) -> ResultatArith<Valeur> {
    total(e, ctx)?.diviser(Valeur::entier(e.len() as i64), ctx)
}

fn somme(v: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    total(echantillon(&v, "SUM")?, ctx)
}

fn longueur(v: Valeur, _ctx: Contexte) -> ResultatArith<Valeur> {
    Ok(Valeur::entier(echantillon(&v, "LEN")?.len() as i64))
}

fn tri(v: Valeur, _ctx: Contexte) -> ResultatArith<Valeur> {
    Ok(Valeur::tableau(trie(echantillon(&v, "SORT")?)?))
}

fn moyenne(v: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    moyenne_de(non_vide(&v, "MEAN")?, ctx)
}

fn mediane(v: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    let e = trie(non_vide(&v, "MEDIAN")?)?;
    let milieu = e.len() / 2;
    if e.len() % 2 == 1 {
        return Ok(e[milieu].clone());
    }
    e[milieu - 1]
        .clone()
        .additionner(e[milieu].clone(), ctx)?
        .diviser(Valeur::entier(2), ctx)
}

/// Moyenne des carrés des écarts à la moyenne.
fn variance(v: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    let e = non_vide(&v, "VARIANCE")?;
    let m = moyenne_de(e, ctx)?;
    let carres = e
        .iter()
        .map(|x| {
            let d = x.clone().soustraire(m.clone(), ctx)?;
            d.clone().multiplier(d, ctx)
        })
        .collect::<ResultatArith<Vec<_>>>()?;
    moyenne_de(&carres, ctx)
}

fn ecart_type(v: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
    racine(variance(v, ctx)?, ctx)
}

pub fn jetons(_reglages: &Reglages) -> Vec<Jeton> {
    let mut v = vec![
        Jeton::fonction("SUM", PREC_IMPLICITE, somme).avec_aide("Somme des éléments"),
        Jeton::fonction("LEN", PREC_IMPLICITE, longueur).avec_aide("Nombre d’éléments"),
        Jeton::fonction("SORT", PREC_IMPLICITE, tri).avec_aide("Tableau trié"),
        Jeton::fonction("MEAN", PREC_IMPLICITE, moyenne).avec_aide("Moyenne"),
        Jeton::fonction("MEDIAN", PREC_IMPLICITE, mediane).avec_aide("Médiane"),
        Jeton::fonction("VARIANCE", PREC_IMPLICITE, variance).avec_aide("Variance"),
        Jeton::fonction("DEVIATION", PREC_IMPLICITE, ecart_type).avec_aide("Écart type"),
    ];
    v.extend(crochets());
    v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::decimal::Decimal;
    use crate::noyau::quantite::{Quantite, Unites};

    const P: Contexte = Contexte { precision: 28 };

    fn tableau(x: &[i64]) -> Valeur {
        Valeur::tableau(x.iter().map(|&n| Valeur::entier(n)).collect())
    }

    #[test]
    fn resume_d_un_tableau() {
        let t = tableau(&[4, 1, 3, 2]);
        assert_eq!(somme(t.clone(), P), Ok(Valeur::entier(10)));
        assert_eq!(longueur(t.clone(), P), Ok(Valeur::entier(4)));
        assert_eq!(tri(t.clone(), P), Ok(tableau(&[1, 2, 3, 4])));
        assert_eq!(moyenne(t.clone(), P), Ok(Valeur::Nombre("2.5".parse().unwrap())));
        assert_eq!(mediane(t, P), Ok(Valeur::Nombre("2.5".parse().unwrap())));
        assert_eq!(mediane(tableau(&[5, 1, 3]), P), Ok(Valeur::entier(3)));
    }

    #[test]
    fn dispersion() {
        let t = tableau(&[2, 4, 4, 4, 5, 5, 7, 9]);
        assert_eq!(variance(t.clone(), P), Ok(Valeur::entier(4)));
        assert_eq!(ecart_type(t, P), Ok(Valeur::entier(2)));
    }

    #[test]
    fn cas_limites() {
        assert_eq!(somme(tableau(&[]), P), Ok(Valeur::entier(0)));
        assert!(moyenne(tableau(&[]), P).is_err());
        assert!(somme(Valeur::entier(3), P).is_err());

        let melange = Valeur::tableau(vec![
            Valeur::entier(1),
            Valeur::Quantite(Quantite::new(Decimal::un(), Unites::une("m"))),
        ]);
        assert!(tri(melange, P).is_err());
    }
}
