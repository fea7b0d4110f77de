// src/noyau/decoupage.rs
//
// Découpage d’une entrée en instructions, puis en mots
// ----------------------------------------------------
// Un seul passage, un caractère de recul (dernier caractère du dernier mot) et un
// drapeau `nouveau` (prochain caractère = nouveau mot) :
// - guillemets : le mot accumule tout jusqu’au guillemet fermant (inclus)
// - séparateur d’instructions : nouvelle instruction
// - blanc : nouveau mot, jamais conservé
// - lettre (ou '_') : nouveau mot après une non-lettre ou un blanc
// - chiffre (ou séparateur décimal, normalisé en '.') : nouveau mot seulement après un blanc
// - séparateur de groupes : collé à un nombre en cours
// - tout autre symbole : mot d’un seul caractère
//
// '{' et '}' sont lus comme '(' et ')'.

use super::erreur::{ErreurCalcul, ResultatCalcul};
use super::reglages::{Reglages, GUILLEMET};

pub fn est_lettre(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Mot numérique : commence par un chiffre ou un point.
pub fn est_numerique(mot: &str) -> bool {
    mot.starts_with(|c: char| c.is_ascii_digit() || c == '.')
}

fn ajouter(mots: &mut Vec<String>, c: char, nouveau_mot: bool) {
    match mots.last_mut() {
        Some(m) if !nouveau_mot => m.push(c),
        _ => mots.push(c.to_string()),
    }
}

pub fn decouper(entree: &str, reglages: &Reglages) -> ResultatCalcul<Vec<Vec<String>>> {
    let mut instructions: Vec<Vec<String>> = Vec::new();
    let mut mots: Vec<String> = Vec::new();
    let mut nouveau = true;
    let mut dans_texte = false;

    for c in entree.chars() {
        if dans_texte {
            ajouter(&mut mots, c, false);
            if c == GUILLEMET {
                dans_texte = false;
                nouveau = true;
            }
            continue;
        }

        if c == GUILLEMET {
            ajouter(&mut mots, c, true);
            dans_texte = true;
            continue;
        }

        if c == reglages.separateur_instructions {
            instructions.push(std::mem::take(&mut mots));
            nouveau = true;
            continue;
        }

        if c.is_whitespace() {
            nouveau = true;
            continue;
        }

        let dernier = mots.last().and_then(|m| m.chars().last());

        if c == reglages.separateur_groupes
            && !nouveau
            && mots.last().is_some_and(|m| est_numerique(m))
        {
            ajouter(&mut mots, c, false);
        } else if est_lettre(c) {
            ajouter(&mut mots, c, nouveau || !dernier.is_some_and(est_lettre));
            nouveau = false;
        } else if c.is_ascii_digit() {
            ajouter(&mut mots, c, nouveau);
            nouveau = false;
        } else if reglages.separateurs_decimaux.contains(&c) {
            ajouter(&mut mots, '.', nouveau);
            nouveau = false;
        } else {
            let c = match c {
                '{' => '(',
                '}' => ')',
                autre => autre,
            };
            ajouter(&mut mots, c, true);
            nouveau = true;
        }
    }

    if dans_texte {
        return Err(ErreurCalcul::GuillemetsNonFermes);
    }

    instructions.push(mots);
    Ok(instructions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn d(s: &str) -> Vec<Vec<String>> {
        decouper(s, &Reglages::default()).unwrap()
    }

    fn une(s: &str) -> Vec<String> {
        let mut v = d(s);
        assert_eq!(v.len(), 1, "une seule instruction attendue pour {s:?}");
        v.remove(0)
    }

    #[test]
    fn mots_de_base() {
        assert_eq!(une("2x+sin(y)"), ["2", "x", "+", "sin", "(", "y", ")"]);
        assert_eq!(une("x2 ab_c"), ["x2", "ab_c"]);
        assert_eq!(une("12.5*.5"), ["12.5", "*", ".5"]);
        assert_eq!(une("--"), ["-", "-"]);
        assert_eq!(une("{1}"), ["(", "1", ")"]);
    }

    #[test]
    fn separateur_de_groupes() {
        assert_eq!(une("1_000_000"), ["1_000_000"]);
        assert_eq!(une("x _1"), ["x", "_1"]);
    }

    #[test]
    fn textes() {
        assert_eq!(une(r#"M "H2O; x""#), ["M", "\"H2O; x\""]);
        assert_eq!(une(r#""a"2"#), ["\"a\"", "2"]);
        assert_eq!(
            decouper(r#"M "H2O"#, &Reglages::default()),
            Err(ErreurCalcul::GuillemetsNonFermes)
        );
    }

    #[test]
    fn instructions_multiples() {
        assert_eq!(d("x=1;2"), vec![vec!["x", "=", "1"], vec!["2"]]);
        assert_eq!(d(";"), vec![Vec::<String>::new(), Vec::new()]);
        assert_eq!(d("1;;2").len(), 3);
    }

    #[test]
    fn separateur_decimal_configurable() {
        let r = Reglages {
            separateurs_decimaux: vec!['.', ','],
            separateur_vecteur: ";".into(),
            separateur_instructions: '|',
            ..Reglages::default()
        };
        assert_eq!(decouper("1,5|2", &r).unwrap(), vec![vec!["1.5"], vec!["2"]]);
    }
}
