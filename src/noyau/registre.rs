// src/noyau/registre.rs
//
// Registre statique : opérateurs, fonctions, crochets, constantes et unités.
// Construit une fois à partir des modules choisis dans les réglages ; en cas de
// conflit de nom, le module chargé le plus tard l’emporte.

use std::collections::HashMap;

use super::jetons::{Genre, Jeton, NOM_IMPLICITE};
use super::modules::MODULES;
use super::reglages::Reglages;
use super::valeur::Valeur;

/// Module toujours chargé.
pub const MODULE_BASE: &str = "base";

#[derive(Clone, Debug, Default)]
pub struct Registre {
    jetons: HashMap<String, Jeton>,
}

impl Registre {
    pub fn vide() -> Self {
        Self::default()
    }

    pub fn depuis_reglages(reglages: &Reglages) -> Self {
        for nom in reglages.charger.iter().chain(&reglages.exclure) {
            if !MODULES.iter().any(|m| m.nom == nom) {
                tracing::warn!(module = %nom, "module inconnu ignoré");
            }
        }

        let mut registre = Self::vide();
        for module in MODULES {
            let demande =
                reglages.tout_charger || reglages.charger.iter().any(|c| c == module.nom);
            let exclu = reglages.exclure.iter().any(|e| e == module.nom);

            if module.nom == MODULE_BASE || (demande && !exclu) {
                for jeton in (module.jetons)(reglages) {
                    registre.ajouter(jeton);
                }
                tracing::debug!(module = module.nom, "module chargé");
            }
        }
        registre
    }

    /// Ajoute (ou remplace) un jeton sous son nom.
    pub fn ajouter(&mut self, jeton: Jeton) {
        self.jetons.insert(jeton.nom().to_string(), jeton);
    }

    pub fn obtenir(&self, nom: &str) -> Option<&Jeton> {
        self.jetons.get(nom)
    }

    pub fn contient(&self, nom: &str) -> bool {
        self.jetons.contains_key(nom)
    }

    /// Jeton fusionné "premier second" (ex. "sin ^").
    pub fn fusion(&self, premier: &str, second: &str) -> Option<&Jeton> {
        self.obtenir(&format!("{premier} {second}"))
    }

    /// Forme préfixe d’un opérateur (" -").
    pub fn prefixe(&self, nom: &str) -> Option<&Jeton> {
        self.obtenir(&format!(" {nom}"))
    }

    pub fn aide(&self, nom: &str) -> Option<&'static str> {
        self.obtenir(nom).map(Jeton::aide).filter(|a| !a.is_empty())
    }

    fn est_interne(nom: &str) -> bool {
        nom.contains(' ') || nom == NOM_IMPLICITE
    }

    /// Opérateurs, fonctions et crochets visibles, triés.
    pub fn noms_fonctions(&self) -> Vec<&str> {
        let mut noms: Vec<&str> = self
            .jetons
            .values()
            .filter(|j| j.genre() != Genre::Variable && !Self::est_interne(j.nom()))
            .map(Jeton::nom)
            .collect();
        noms.sort_unstable();
        noms
    }

    /// Unités (constantes porteuses d’unités), triées.
    pub fn noms_unites(&self) -> Vec<&str> {
        let mut noms: Vec<&str> = self
            .jetons
            .values()
            .filter(|j| matches!(j.valeur(), Some(Valeur::Quantite(_))))
            .map(Jeton::nom)
            .collect();
        noms.sort_unstable();
        noms
    }

    pub fn len(&self) -> usize {
        self.jetons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jetons.is_empty()
    }
}
