// src/noyau/valeur.rs
//
// Valeurs manipulées par l’évaluateur
// -----------------------------------
// - Nombre / Quantité / Texte / Vecteur / Tableau
// - NomInconnu : nom non résolu (mode différé) ; toute opération dessus échoue
//
// Vecteur et Tableau partagent leurs éléments (Rc) : copier une valeur est bon marché,
// une modification passe par Rc::make_mut (copie à l’écriture).

use std::cmp::Ordering;
use std::rc::Rc;

use super::analyse;
use super::decimal::{Contexte, Decimal};
use super::erreur::{ErreurArith, ResultatArith};
use super::quantite::{self, Quantite};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Valeur {
    Nombre(Decimal),
    Quantite(Quantite),
    Texte(String),
    /// Vecteur mathématique (produit scalaire, mise à l’échelle)
    Vecteur(Rc<Vec<Valeur>>),
    /// Tableau : opérations diffusées élément par élément
    Tableau(Rc<Vec<Valeur>>),
    NomInconnu(String),
}

pub type OpBinaire = fn(Valeur, Valeur, Contexte) -> ResultatArith<Valeur>;
pub type OpUnaire = fn(Valeur, Contexte) -> ResultatArith<Valeur>;

impl From<Decimal> for Valeur {
    fn from(d: Decimal) -> Self {
        Valeur::Nombre(d)
    }
}

impl Valeur {
    pub fn entier(n: i64) -> Self {
        Valeur::Nombre(Decimal::from(n))
    }

    pub fn vecteur(elements: Vec<Valeur>) -> Self {
        Valeur::Vecteur(Rc::new(elements))
    }

    pub fn tableau(elements: Vec<Valeur>) -> Self {
        Valeur::Tableau(Rc::new(elements))
    }

    /// Quantité sans unité → nombre.
    pub fn depuis_quantite(q: Quantite) -> Self {
        if q.unites.est_vide() {
            Valeur::Nombre(q.valeur)
        } else {
            Valeur::Quantite(q)
        }
    }

    pub fn genre(&self) -> &'static str {
        match self {
            Valeur::Nombre(_) => "un nombre",
            Valeur::Quantite(_) => "une quantité",
            Valeur::Texte(_) => "du texte",
            Valeur::Vecteur(_) => "un vecteur",
            Valeur::Tableau(_) => "un tableau",
            Valeur::NomInconnu(_) => "un nom inconnu",
        }
    }

    /// Éléments d’un vecteur ou d’un tableau.
    pub fn elements(&self) -> Option<&[Valeur]> {
        match self {
            Valeur::Vecteur(v) | Valeur::Tableau(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// Copie arrondie à la précision du contexte (récursif).
    pub fn arrondie(&self, ctx: Contexte) -> Valeur {
        match self {
            Valeur::Nombre(d) => Valeur::Nombre(d.arrondi(ctx)),
            Valeur::Quantite(q) => Valeur::Quantite(q.avec_valeur(q.valeur.arrondi(ctx))),
            Valeur::Vecteur(v) => Valeur::vecteur(v.iter().map(|e| e.arrondie(ctx)).collect()),
            Valeur::Tableau(v) => Valeur::tableau(v.iter().map(|e| e.arrondie(ctx)).collect()),
            Valeur::Texte(_) | Valeur::NomInconnu(_) => self.clone(),
        }
    }

    /// Erreur si un nom inconnu subsiste (y compris dans un vecteur / tableau).
    pub fn verifier_connue(&self) -> ResultatArith<()> {
        match self {
            Valeur::NomInconnu(n) => Err(ErreurArith::NomInconnu(n.clone())),
            Valeur::Vecteur(v) | Valeur::Tableau(v) => {
                v.iter().try_for_each(Valeur::verifier_connue)
            }
            _ => Ok(()),
        }
    }

    /* ------------------------ arithmétique ------------------------ */

    pub fn additionner(self, autre: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
        use Valeur::*;

        match (self, autre) {
            (NomInconnu(n), _) | (_, NomInconnu(n)) => Err(ErreurArith::NomInconnu(n)),
            (a @ Tableau(_), b) | (a, b @ Tableau(_)) => {
                diffuser(a, b, ctx, Valeur::additionner, "addition")
            }
            (Nombre(a), Nombre(b)) => Ok(Nombre(a.add(&b, ctx))),
            (Quantite(a), Quantite(b)) if a.unites == b.unites => {
                Ok(Quantite(a.avec_valeur(a.valeur.add(&b.valeur, ctx))))
            }
            (Quantite(_), Quantite(_) | Nombre(_)) | (Nombre(_), Quantite(_)) => {
                Err(ErreurArith::UnitesDifferentes("addition"))
            }
            (Texte(a), Texte(b)) => Ok(Texte(a + &b)),
            (Vecteur(a), Vecteur(b)) => par_paires(&a, &b, ctx, Valeur::additionner, "addition"),
            (a, b) => Err(incompatibles("addition", &a, &b)),
        }
    }

    pub fn soustraire(self, autre: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
        use Valeur::*;

        match (self, autre) {
            (NomInconnu(n), _) | (_, NomInconnu(n)) => Err(ErreurArith::NomInconnu(n)),
            (a @ Tableau(_), b) | (a, b @ Tableau(_)) => {
                diffuser(a, b, ctx, Valeur::soustraire, "soustraction")
            }
            (Nombre(a), Nombre(b)) => Ok(Nombre(a.sub(&b, ctx))),
            (Quantite(a), Quantite(b)) if a.unites == b.unites => {
                Ok(Quantite(a.avec_valeur(a.valeur.sub(&b.valeur, ctx))))
            }
            (Quantite(_), Quantite(_) | Nombre(_)) | (Nombre(_), Quantite(_)) => {
                Err(ErreurArith::UnitesDifferentes("soustraction"))
            }
            (Vecteur(a), Vecteur(b)) => {
                par_paires(&a, &b, ctx, Valeur::soustraire, "soustraction")
            }
            (a, b) => Err(incompatibles("soustraction", &a, &b)),
        }
    }

    pub fn multiplier(self, autre: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
        use Valeur::*;

        match (self, autre) {
            (NomInconnu(n), _) | (_, NomInconnu(n)) => Err(ErreurArith::NomInconnu(n)),
            (a @ Tableau(_), b) | (a, b @ Tableau(_)) => {
                diffuser(a, b, ctx, Valeur::multiplier, "multiplication")
            }
            (Nombre(a), Nombre(b)) => Ok(Nombre(a.mul(&b, ctx)?)),
            (Quantite(a), Quantite(b)) => Ok(Valeur::depuis_quantite(quantite::Quantite::new(
                a.valeur.mul(&b.valeur, ctx)?,
                &a.unites + &b.unites,
            ))),
            (Quantite(q), Nombre(n)) | (Nombre(n), Quantite(q)) => {
                Ok(Quantite(q.avec_valeur(q.valeur.mul(&n, ctx)?)))
            }
            (Vecteur(a), Vecteur(b)) => produit_scalaire(&a, &b, ctx),
            (Vecteur(v), s @ (Nombre(_) | Quantite(_)))
            | (s @ (Nombre(_) | Quantite(_)), Vecteur(v)) => {
                let elements = v
                    .iter()
                    .map(|e| s.clone().multiplier(e.clone(), ctx))
                    .collect::<ResultatArith<Vec<_>>>()?;
                Ok(Valeur::vecteur(elements))
            }
            (a, b) => Err(incompatibles("multiplication", &a, &b)),
        }
    }

    pub fn diviser(self, autre: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
        use Valeur::*;

        match (self, autre) {
            (NomInconnu(n), _) | (_, NomInconnu(n)) => Err(ErreurArith::NomInconnu(n)),
            (a @ Tableau(_), b) | (a, b @ Tableau(_)) => {
                diffuser(a, b, ctx, Valeur::diviser, "division")
            }
            (Nombre(a), Nombre(b)) => Ok(Nombre(a.div(&b, ctx)?)),
            (Quantite(a), Quantite(b)) => Ok(Valeur::depuis_quantite(quantite::Quantite::new(
                a.valeur.div(&b.valeur, ctx)?,
                &a.unites - &b.unites,
            ))),
            (Quantite(q), Nombre(n)) => Ok(Quantite(q.avec_valeur(q.valeur.div(&n, ctx)?))),
            (Nombre(n), Quantite(q)) => Ok(Quantite(quantite::Quantite::new(
                n.div(&q.valeur, ctx)?,
                -&q.unites,
            ))),
            (Vecteur(v), s @ (Nombre(_) | Quantite(_))) => {
                let elements = v
                    .iter()
                    .map(|e| e.clone().diviser(s.clone(), ctx))
                    .collect::<ResultatArith<Vec<_>>>()?;
                Ok(Valeur::vecteur(elements))
            }
            (a, b) => Err(incompatibles("division", &a, &b)),
        }
    }

    /// Reste tronqué : nombres, ou quantités de mêmes unités.
    pub fn modulo(self, autre: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
        use Valeur::*;

        match (self, autre) {
            (NomInconnu(n), _) | (_, NomInconnu(n)) => Err(ErreurArith::NomInconnu(n)),
            (a @ Tableau(_), b) | (a, b @ Tableau(_)) => {
                diffuser(a, b, ctx, Valeur::modulo, "modulo")
            }
            (Nombre(a), Nombre(b)) => Ok(Nombre(a.reste(&b, ctx)?)),
            (Quantite(a), Quantite(b)) if a.unites == b.unites => {
                Ok(Quantite(a.avec_valeur(a.valeur.reste(&b.valeur, ctx)?)))
            }
            (Quantite(_), Quantite(_) | Nombre(_)) | (Nombre(_), Quantite(_)) => {
                Err(ErreurArith::UnitesDifferentes("modulo"))
            }
            (a, b) => Err(incompatibles("modulo", &a, &b)),
        }
    }

    pub fn puissance(self, autre: Valeur, ctx: Contexte) -> ResultatArith<Valeur> {
        use Valeur::*;

        match (self, autre) {
            (NomInconnu(n), _) | (_, NomInconnu(n)) => Err(ErreurArith::NomInconnu(n)),
            (a @ Tableau(_), b) | (a, b @ Tableau(_)) => {
                diffuser(a, b, ctx, Valeur::puissance, "puissance")
            }
            (_, Quantite(_)) => Err(ErreurArith::PuissanceQuantite),
            (Nombre(a), Nombre(b)) => Ok(Nombre(analyse::puissance(&a, &b, ctx)?)),
            (Quantite(q), Nombre(n)) => Ok(Valeur::depuis_quantite(quantite::Quantite::new(
                analyse::puissance(&q.valeur, &n, ctx)?,
                q.unites.fois(&n.vers_rationnel()),
            ))),
            (a, b) => Err(incompatibles("puissance", &a, &b)),
        }
    }

    pub fn negation(self, ctx: Contexte) -> ResultatArith<Valeur> {
        match self {
            Valeur::NomInconnu(n) => Err(ErreurArith::NomInconnu(n)),
            Valeur::Nombre(d) => Ok(Valeur::Nombre(d.neg().arrondi(ctx))),
            Valeur::Quantite(q) => Ok(Valeur::Quantite(q.avec_valeur(q.valeur.neg().arrondi(ctx)))),
            Valeur::Vecteur(v) => Ok(Valeur::vecteur(appliquer_a_tous(&v, ctx, Valeur::negation)?)),
            Valeur::Tableau(v) => Ok(Valeur::tableau(appliquer_a_tous(&v, ctx, Valeur::negation)?)),
            Valeur::Texte(_) => Err(ErreurArith::TypeInvalide("négation", "du texte")),
        }
    }

    /// Opérateur de jonction : a, b → (a, b) ; (a, b), c → (a, b, c)
    pub fn joindre(self, autre: Valeur, _ctx: Contexte) -> ResultatArith<Valeur> {
        match self {
            Valeur::Vecteur(mut v) => {
                Rc::make_mut(&mut v).push(autre);
                Ok(Valeur::Vecteur(v))
            }
            a => Ok(Valeur::vecteur(vec![a, autre])),
        }
    }

    /// Ordre entre nombres, ou quantités de mêmes unités.
    pub fn comparer(&self, autre: &Valeur) -> ResultatArith<Ordering> {
        match (self, autre) {
            (Valeur::NomInconnu(n), _) | (_, Valeur::NomInconnu(n)) => {
                Err(ErreurArith::NomInconnu(n.clone()))
            }
            (Valeur::Nombre(a), Valeur::Nombre(b)) => Ok(a.cmp(b)),
            (Valeur::Quantite(a), Valeur::Quantite(b)) if a.unites == b.unites => {
                Ok(a.valeur.cmp(&b.valeur))
            }
            (Valeur::Quantite(_), _) | (_, Valeur::Quantite(_)) => {
                Err(ErreurArith::UnitesDifferentes("comparaison"))
            }
            (a, b) => Err(incompatibles("comparaison", a, b)),
        }
    }

    /// Applique une fonction numérique : nombre, ou élément par élément.
    pub fn appliquer_numerique<F>(self, nom: &'static str, ctx: Contexte, f: F) -> ResultatArith<Valeur>
    where
        F: Fn(&Decimal, Contexte) -> ResultatArith<Decimal> + Copy,
    {
        match self {
            Valeur::Nombre(d) => Ok(Valeur::Nombre(f(&d, ctx)?)),
            Valeur::Tableau(v) => {
                let elements = v
                    .iter()
                    .map(|e| e.clone().appliquer_numerique(nom, ctx, f))
                    .collect::<ResultatArith<Vec<_>>>()?;
                Ok(Valeur::tableau(elements))
            }
            Valeur::NomInconnu(n) => Err(ErreurArith::NomInconnu(n)),
            autre => Err(ErreurArith::TypeInvalide(nom, autre.genre())),
        }
    }
}

fn incompatibles(operation: &'static str, a: &Valeur, b: &Valeur) -> ErreurArith {
    ErreurArith::TypesIncompatibles {
        operation,
        gauche: a.genre(),
        droite: b.genre(),
    }
}

fn appliquer_a_tous(v: &[Valeur], ctx: Contexte, op: OpUnaire) -> ResultatArith<Vec<Valeur>> {
    v.iter().map(|e| op(e.clone(), ctx)).collect()
}

/// Éléments appariés (même taille exigée), résultat : vecteur.
fn par_paires(
    a: &[Valeur],
    b: &[Valeur],
    ctx: Contexte,
    op: OpBinaire,
    nom: &'static str,
) -> ResultatArith<Valeur> {
    if a.len() != b.len() {
        return Err(ErreurArith::TaillesDifferentes(nom));
    }
    let elements = a
        .iter()
        .zip(b)
        .map(|(x, y)| op(x.clone(), y.clone(), ctx))
        .collect::<ResultatArith<Vec<_>>>()?;
    Ok(Valeur::vecteur(elements))
}

/// Diffusion sur tableau(x) : tableau ⊕ tableau (même taille), tableau ⊕ autre, autre ⊕ tableau.
fn diffuser(
    a: Valeur,
    b: Valeur,
    ctx: Contexte,
    op: OpBinaire,
    nom: &'static str,
) -> ResultatArith<Valeur> {
    let elements = match (a, b) {
        (Valeur::Tableau(x), Valeur::Tableau(y)) => {
            if x.len() != y.len() {
                return Err(ErreurArith::TaillesDifferentes(nom));
            }
            x.iter()
                .zip(y.iter())
                .map(|(e, f)| op(e.clone(), f.clone(), ctx))
                .collect::<ResultatArith<Vec<_>>>()?
        }
        (Valeur::Tableau(x), b) => x
            .iter()
            .map(|e| op(e.clone(), b.clone(), ctx))
            .collect::<ResultatArith<Vec<_>>>()?,
        (a, Valeur::Tableau(y)) => y
            .iter()
            .map(|e| op(a.clone(), e.clone(), ctx))
            .collect::<ResultatArith<Vec<_>>>()?,
        (a, b) => return op(a, b, ctx),
    };
    Ok(Valeur::tableau(elements))
}

/// Σ aᵢ·bᵢ, accumulé à partir du premier produit (unités conservées).
fn produit_scalaire(a: &[Valeur], b: &[Valeur], ctx: Contexte) -> ResultatArith<Valeur> {
    if a.len() != b.len() {
        return Err(ErreurArith::TaillesDifferentes("produit scalaire"));
    }
    let mut somme: Option<Valeur> = None;
    for (x, y) in a.iter().zip(b) {
        let p = x.clone().multiplier(y.clone(), ctx)?;
        somme = Some(match somme {
            None => p,
            Some(s) => s.additionner(p, ctx)?,
        });
    }
    Ok(somme.unwrap_or_else(|| Valeur::entier(0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::noyau::quantite::Unites;
    use pretty_assertions::assert_eq;

    const P: Contexte = Contexte { precision: 28 };

    fn n(s: &str) -> Valeur {
        Valeur::Nombre(s.parse().unwrap())
    }

    fn metres(s: &str) -> Valeur {
        Valeur::Quantite(Quantite::new(s.parse().unwrap(), Unites::une("m")))
    }

    #[test]
    fn quantites() {
        assert_eq!(metres("2").additionner(metres("3"), P), Ok(metres("5")));
        assert_eq!(
            metres("2").additionner(n("3"), P),
            Err(ErreurArith::UnitesDifferentes("addition"))
        );

        // m / m → nombre
        assert_eq!(metres("6").diviser(metres("3"), P), Ok(n("2")));

        // 1 / m → m^-1
        let inverse = n("1").diviser(metres("2"), P).unwrap();
        assert!(matches!(&inverse, Valeur::Quantite(q) if q.unites.to_string() == "m^-1"));

        // Q / n divise bien la valeur
        assert_eq!(metres("6").diviser(n("3"), P), Ok(metres("2")));

        assert_eq!(n("2").puissance(metres("1"), P), Err(ErreurArith::PuissanceQuantite));
        let carre = metres("3").puissance(n("2"), P).unwrap();
        assert!(matches!(&carre, Valeur::Quantite(q) if q.unites.to_string() == "m^2"));
    }

    #[test]
    fn vecteurs() {
        let v = Valeur::vecteur(vec![n("1"), n("2")]);
        let w = Valeur::vecteur(vec![n("3"), n("4")]);

        assert_eq!(v.clone().multiplier(w.clone(), P), Ok(n("11")));
        assert_eq!(
            v.clone().additionner(w.clone(), P),
            Ok(Valeur::vecteur(vec![n("4"), n("6")]))
        );
        assert_eq!(
            n("2").multiplier(v.clone(), P),
            Ok(Valeur::vecteur(vec![n("2"), n("4")]))
        );
        assert!(v.clone().diviser(w, P).is_err());

        let court = Valeur::vecteur(vec![n("1")]);
        assert_eq!(
            v.additionner(court, P),
            Err(ErreurArith::TaillesDifferentes("addition"))
        );
    }

    #[test]
    fn tableaux_diffuses() {
        let t = Valeur::tableau(vec![n("1"), n("2"), n("3")]);
        assert_eq!(
            t.clone().multiplier(n("10"), P),
            Ok(Valeur::tableau(vec![n("10"), n("20"), n("30")]))
        );
        assert_eq!(
            n("1").soustraire(t.clone(), P),
            Ok(Valeur::tableau(vec![n("0"), n("-1"), n("-2")]))
        );
        assert_eq!(
            t.clone().additionner(t, P),
            Ok(Valeur::tableau(vec![n("2"), n("4"), n("6")]))
        );
    }

    #[test]
    fn jonction_copie_a_l_ecriture() {
        let ab = n("1").joindre(n("2"), P).unwrap();
        let partage = ab.clone();
        let abc = ab.joindre(n("3"), P).unwrap();

        assert_eq!(partage.elements().map(<[Valeur]>::len), Some(2));
        assert_eq!(abc.elements().map(<[Valeur]>::len), Some(3));
    }

    #[test]
    fn textes_et_noms_inconnus() {
        let a = Valeur::Texte("ab".into());
        let b = Valeur::Texte("cd".into());
        assert_eq!(a.clone().additionner(b, P), Ok(Valeur::Texte("abcd".into())));
        assert!(a.multiplier(n("2"), P).is_err());

        let inconnu = Valeur::NomInconnu("zz".into());
        assert_eq!(
            inconnu.clone().additionner(n("1"), P),
            Err(ErreurArith::NomInconnu("zz".into()))
        );
        assert!(Valeur::vecteur(vec![n("1"), inconnu]).verifier_connue().is_err());
    }
}
