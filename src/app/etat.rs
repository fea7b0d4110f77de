//! src/app/etat.rs
//!
//! État UI : entrée, réponse affichée, historique, précision.
//!
//! Rôle : contenir l’état de la fenêtre et la session de calcul, et offrir des
//! opérations simples (C/CLR/AC) sans logique d’affichage.
//!
//! Contrats :
//! - Aucun parsing ici : tout passe par `Calculatrice::calculer` / `reponse`.
//! - Historique borné (anti-gel sur de longues sessions).

use crate::noyau::reglages::{PRECISION_MAX, PRECISION_MIN};
use crate::noyau::{Calculatrice, Reglages};

/// Garde-fou : nombre de lignes d’historique conservées.
const HISTORIQUE_MAX: usize = 200;

/// Une ligne évaluée.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ligne {
    pub entree: String,
    pub sortie: String,
    pub erreur: bool,
}

pub struct AppCalc {
    // --- entrée utilisateur ---
    pub entree: String,

    // --- sorties ---
    pub reponse: String,
    pub erreur: String,
    pub historique: Vec<Ligne>,

    // --- session ---
    pub calc: Calculatrice,
    pub precision: u32,

    // --- UX ---
    // Permet à vue.rs de redonner le focus à l’entrée après un clic sur un bouton.
    pub focus_entree: bool,
}

impl Default for AppCalc {
    fn default() -> Self {
        Self::new(Reglages::default())
    }
}

impl AppCalc {
    pub fn new(reglages: Reglages) -> Self {
        let calc = Calculatrice::new(reglages);
        let precision = calc.reglages().precision;
        Self {
            entree: String::new(),
            reponse: String::new(),
            erreur: String::new(),
            historique: Vec::new(),
            calc,
            precision,
            focus_entree: true,
        }
    }

    /* ------------------------ Actions “boutons” ------------------------ */

    /// AC : entrée, résultats, historique et variables.
    pub fn reset_total(&mut self) {
        self.entree.clear();
        self.clear_resultats();
        self.historique.clear();
        self.calc.reinitialiser();
        self.focus_entree = true;
    }

    /// C : effacer seulement l’entrée.
    pub fn clear_entree(&mut self) {
        self.entree.clear();
        self.focus_entree = true;
    }

    /// CLR : effacer réponse + erreur (variables conservées).
    pub fn clear_resultats(&mut self) {
        self.reponse.clear();
        self.erreur.clear();
        self.focus_entree = true;
    }

    pub fn set_precision(&mut self, precision: u32) {
        self.precision = precision.clamp(PRECISION_MIN, PRECISION_MAX);
        self.calc.changer_precision(self.precision);
        self.focus_entree = true;
    }

    /// Évalue l’entrée courante et range la réponse (ou l’erreur) + une ligne d’historique.
    ///
    /// La dernière réponse reste à l’écran en cas d’erreur ou d’instruction silencieuse.
    pub fn evaluer(&mut self) {
        let entree = self.entree.trim().to_string();
        if entree.is_empty() {
            return;
        }

        self.calc.calculer(&entree);
        let (erreur, texte) = self.calc.reponse();

        if erreur {
            self.erreur = texte.clone();
        } else {
            self.erreur.clear();
            if !self.calc.est_silencieux() {
                self.reponse = texte.clone();
            }
        }

        self.historique.push(Ligne {
            entree,
            sortie: texte,
            erreur,
        });
        if self.historique.len() > HISTORIQUE_MAX {
            let trop = self.historique.len() - HISTORIQUE_MAX;
            self.historique.drain(..trop);
        }

        self.focus_entree = true;
    }

    /// Reprend une ligne d’historique dans l’entrée.
    pub fn reprendre(&mut self, index: usize) {
        if let Some(l) = self.historique.get(index) {
            self.entree = l.entree.clone();
            self.focus_entree = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn saisir(app: &mut AppCalc, texte: &str) {
        app.entree = texte.into();
        app.evaluer();
    }

    #[test]
    fn evaluation_et_historique() {
        let mut app = AppCalc::default();
        saisir(&mut app, "x = 2 + 3");
        assert_eq!(app.reponse, "5");
        assert!(app.erreur.is_empty());

        saisir(&mut app, "x : 0");
        assert!(!app.erreur.is_empty());
        // la réponse précédente reste affichée
        assert_eq!(app.reponse, "5");

        assert_eq!(app.historique.len(), 2);
        assert!(app.historique[1].erreur);

        app.reprendre(0);
        assert_eq!(app.entree, "x = 2 + 3");
    }

    #[test]
    fn instruction_silencieuse() {
        let mut app = AppCalc::default();
        saisir(&mut app, "y = 3");
        saisir(&mut app, "/d y");
        assert_eq!(app.reponse, "3");
        assert!(app.erreur.is_empty());
        assert!(app.calc.valeur("y").is_none());
    }

    #[test]
    fn entree_vide_ignoree() {
        let mut app = AppCalc::default();
        saisir(&mut app, "   ");
        assert!(app.historique.is_empty());
    }

    #[test]
    fn actions_c_clr_ac() {
        let mut app = AppCalc::default();
        saisir(&mut app, "y = 7");

        app.entree = "1 +".into();
        app.clear_entree();
        assert!(app.entree.is_empty());
        assert_eq!(app.reponse, "7");

        app.clear_resultats();
        assert!(app.reponse.is_empty());
        assert!(app.calc.valeur("y").is_some());

        app.reset_total();
        assert!(app.historique.is_empty());
        assert!(app.calc.valeur("y").is_none());
    }

    #[test]
    fn precision_bornee() {
        let mut app = AppCalc::default();
        app.set_precision(1);
        assert_eq!(app.precision, PRECISION_MIN);
        assert_eq!(app.calc.reglages().precision, PRECISION_MIN);
        app.set_precision(10_000);
        assert_eq!(app.precision, PRECISION_MAX);
    }

    #[test]
    fn historique_borne() {
        let mut app = AppCalc::default();
        for i in 0..(HISTORIQUE_MAX + 5) {
            saisir(&mut app, &i.to_string());
        }
        assert_eq!(app.historique.len(), HISTORIQUE_MAX);
        assert_eq!(app.historique[0].entree, "5");
    }
}
