// src/noyau/completion.rs
//
// Complétion de l’infixe : ajoute ce que l’utilisateur a omis.
// Pour chaque jeton, comparé au dernier jeton émis (au départ : une parenthèse ouvrante) :
// 1. fusion : le registre connaît "dernier jeton" → le dernier jeton est remplacé
// 2. signe : après un ouvrant / opérateur / fonction, '+' disparaît et '-' devient
//    sa forme préfixe (" -")
// 3. multiplication implicite entre une valeur (ou un fermant) et une valeur, un
//    ouvrant ou une fonction : 2x, 2(x), (a)(b), 2 sin x
// Après une fonction double ("sin ^"), l’opérande qui suit est son exposant :
// pas de multiplication implicite juste après lui (sin^2 x, sin^2(x)).
//
// Les crochets sont suivis sur une pile : un fermant doit correspondre au dernier ouvrant.

use super::erreur::{ErreurCalcul, ResultatCalcul};
use super::jetons::{Genre, Jeton, NOM_IMPLICITE};
use super::registre::Registre;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Exposant {
    Aucun,
    /// juste après une fonction double
    Attendu,
    /// exposant entre crochets, profondeur de l’ouvrant
    Groupe(usize),
    /// exposant lu : pas de multiplication implicite au jeton suivant
    Lu,
}

fn accepte_signe(genre: Genre) -> bool {
    matches!(
        genre,
        Genre::ParOuvrante | Genre::Ouvrant | Genre::Operateur | Genre::Double | Genre::Fonction
    )
}

fn termine_valeur(genre: Genre) -> bool {
    matches!(
        genre,
        Genre::Variable | Genre::ParFermante | Genre::Fermant | Genre::Nombre
    )
}

fn commence_valeur(genre: Genre) -> bool {
    matches!(
        genre,
        Genre::Variable | Genre::ParOuvrante | Genre::Ouvrant | Genre::Nombre | Genre::Fonction
    )
}

pub fn completer(jetons: Vec<Jeton>, registre: &Registre) -> ResultatCalcul<Vec<Jeton>> {
    let mut out: Vec<Jeton> = Vec::with_capacity(jetons.len() * 2);
    let mut ouverts: Vec<Jeton> = Vec::new();
    let mut exposant = Exposant::Aucun;

    for jeton in jetons {
        let genre_dernier = out.last().map_or(Genre::ParOuvrante, Jeton::genre);

        // 1. fusion
        let fusion = out
            .last()
            .and_then(|dernier| registre.fusion(dernier.nom(), jeton.nom()))
            .cloned();
        if let Some(fusion) = fusion {
            out.pop();
            if fusion.genre() == Genre::Double {
                exposant = Exposant::Attendu;
            }
            out.push(fusion);
            continue;
        }

        // 2. signe
        let jeton = if accepte_signe(genre_dernier) && jeton.genre() == Genre::Operateur {
            if jeton.nom() == "+" {
                continue;
            }
            match registre.prefixe(jeton.nom()) {
                Some(p) => p.clone(),
                None => jeton,
            }
        } else {
            jeton
        };

        // 3. multiplication implicite
        if exposant != Exposant::Lu
            && termine_valeur(genre_dernier)
            && commence_valeur(jeton.genre())
        {
            let implicite = registre
                .obtenir(NOM_IMPLICITE)
                .ok_or_else(|| ErreurCalcul::NomInconnu(NOM_IMPLICITE.into()))?;
            out.push(implicite.clone());
        }

        // crochets
        let genre = jeton.genre();
        if genre.est_ouvrant() {
            ouverts.push(jeton.clone());
        } else if genre.est_fermant() {
            match ouverts.pop() {
                Some(o) if o.fermeture() == Some(jeton.nom()) => {}
                _ => return Err(ErreurCalcul::CrochetNonOuvert(jeton.nom().into())),
            }
        }

        exposant = match (exposant, genre) {
            (_, Genre::Double) => Exposant::Attendu,
            (Exposant::Attendu, Genre::Fonction) => Exposant::Attendu,
            (Exposant::Attendu, Genre::Nombre | Genre::Variable | Genre::Texte) => Exposant::Lu,
            (Exposant::Attendu, g) if g.est_ouvrant() => Exposant::Groupe(ouverts.len() - 1),
            (Exposant::Groupe(p), g) if g.est_fermant() && ouverts.len() == p => Exposant::Lu,
            (Exposant::Groupe(p), _) => Exposant::Groupe(p),
            _ => Exposant::Aucun,
        };

        out.push(jeton);
    }

    if let Some(o) = ouverts.pop() {
        return Err(ErreurCalcul::CrochetNonFerme(o.nom().into()));
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::decoupage::decouper;
    use crate::noyau::environnement::Environnement;
    use crate::noyau::jetons::{format_jetons, tokenize};
    use crate::noyau::reglages::Reglages;
    use crate::noyau::valeur::Valeur;
    use pretty_assertions::assert_eq;

    fn completer_texte(s: &str) -> ResultatCalcul<String> {
        let r = Reglages::default();
        let reg = Registre::depuis_reglages(&r);
        let mut env = Environnement::nouveau(&r.nom_reponse);
        env.lier("x", Valeur::entier(1));
        env.lier("y", Valeur::entier(2));

        let mots = decouper(s, &r)?.remove(0);
        let jetons = tokenize(&mots, &reg, &env, &r)?;
        Ok(format_jetons(&completer(jetons, &reg)?))
    }

    #[test]
    fn multiplication_implicite() {
        assert_eq!(completer_texte("2x").unwrap(), "2 _dot_ x");
        assert_eq!(completer_texte("2(x)").unwrap(), "2 _dot_ ( x )");
        assert_eq!(completer_texte("(x)(y)").unwrap(), "( x ) _dot_ ( y )");
        assert_eq!(completer_texte("2 sin x").unwrap(), "2 _dot_ sin x");
        assert_eq!(completer_texte("x y").unwrap(), "x _dot_ y");
    }

    #[test]
    fn signes() {
        assert_eq!(completer_texte("-x").unwrap(), "- x");
        assert_eq!(completer_texte("+x").unwrap(), "x");
        assert_eq!(completer_texte("2*-x").unwrap(), "2 * - x");
        assert_eq!(completer_texte("2-x").unwrap(), "2 - x");
    }

    #[test]
    fn fonction_double() {
        assert_eq!(completer_texte("sin^2 x").unwrap(), "sin^ 2 x");
        assert_eq!(completer_texte("sin^2(x)").unwrap(), "sin^ 2 ( x )");
        assert_eq!(completer_texte("3 sin^2 x").unwrap(), "3 _dot_ sin^ 2 x");
    }

    #[test]
    fn crochets() {
        assert_eq!(
            completer_texte("(1+2"),
            Err(ErreurCalcul::CrochetNonFerme("(".into()))
        );
        assert_eq!(
            completer_texte("1+2)"),
            Err(ErreurCalcul::CrochetNonOuvert(")".into()))
        );
        assert_eq!(
            completer_texte("[1, 2)"),
            Err(ErreurCalcul::CrochetNonOuvert(")".into()))
        );
        assert_eq!(completer_texte("[1, 2]").unwrap(), "[ 1 , 2 ]");
    }
}
