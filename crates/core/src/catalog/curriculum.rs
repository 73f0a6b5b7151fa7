use crate::model::SectionId;

/// One piece of static section content, in reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block {
    Heading(&'static str),
    Paragraph(&'static str),
    Bullets(&'static [&'static str]),
    /// Ordered list rendered with 1-based step numbers.
    Steps(&'static [Step]),
    /// Highlighted box with a title, e.g. a tip or a rule.
    Callout {
        title: &'static str,
        body: &'static str,
    },
    /// Side-by-side sender addresses of a legitimate and a forged email.
    SenderComparison {
        legitimate: &'static str,
        forged: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub title: &'static str,
    pub description: &'static str,
}

/// A real phishing email captured as a screenshot, with the tell-tale signs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhishingExample {
    pub title: &'static str,
    /// Path of the screenshot, relative to the asset directory.
    pub image: &'static str,
    pub sender: &'static str,
    pub link: &'static str,
    pub explanation: &'static str,
}

/// A plain-text sample email with the verdict the learner should reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleEmail {
    pub from: &'static str,
    pub subject: &'static str,
    pub body: &'static str,
    pub is_phishing: bool,
    pub explanation: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionContent {
    pub section: SectionId,
    pub blocks: &'static [Block],
}

/// The domain every real example in section 3 points to.
pub const FRAUDULENT_DOMAIN: &str = "identityhorizon.com";

const INTRODUCTION: &[Block] = &[
    Block::Heading("Qu'est-ce que le phishing ?"),
    Block::Paragraph(
        "Le phishing (ou hameçonnage) est une attaque qui consiste à se faire passer pour un tiers de confiance (Google, un collègue, un fournisseur) afin de vous pousser à :",
    ),
    Block::Bullets(&[
        "Fournir vos identifiants/mots de passe",
        "Cliquer sur un lien piégé",
        "Ouvrir une pièce jointe infectée",
        "Réaliser une action (virement, changement RIB...)",
    ]),
    Block::Heading("Pourquoi est-ce utilisé ?"),
    Block::Bullets(&[
        "Accès aux comptes professionnels (Drive, Gmail, etc.)",
        "Usurpation d'identité pour piéger d'autres employés ou partenaires",
        "Vol de données sensibles (clients, fournisseurs, projets)",
        "Rançongiciels / sabotages",
    ]),
    Block::Heading("Risques pour l'entreprise"),
    Block::Bullets(&[
        "Perte ou vol de données",
        "Blocage de services",
        "Dommages à l'image",
        "Sanctions RGPD",
        "Pertes financières (fraude, rançon, escroquerie)",
    ]),
];

const RECOGNITION: &[Block] = &[
    Block::Heading("Analyse comparative : email légitime vs frauduleux"),
    Block::SenderComparison {
        legitimate: "noreply@google.com",
        forged: "noreplv@goog1e-sec.com",
    },
    Block::Heading("Points de vigilance à observer :"),
    Block::Bullets(&[
        "Adresse d'expéditeur",
        "Liens (vérifier avant de cliquer)",
        "Ton alarmiste ou urgent",
        "Pièces jointes inattendues",
        "Demandes inhabituelles ou pressées",
        "Fautes d'orthographe ou de grammaire",
    ]),
    Block::Callout {
        title: "Astuce importante",
        body: "Survolez toujours un lien avant de cliquer pour voir sa vraie destination. L'URL affichée peut être différente de l'URL réelle.",
    },
];

const EXAMPLES_INTRO: &[Block] = &[Block::Paragraph(
    "Analysez ces vrais exemples de phishing. Tous ces emails pointent vers le même domaine frauduleux : identityhorizon.com",
)];

const RESPONSE: &[Block] = &[
    Block::Heading("En cas de doute, suivez cette procédure :"),
    Block::Steps(&[
        Step {
            title: "Ne pas cliquer, ne pas répondre",
            description: "Résistez à l'urgence. Prenez le temps de réfléchir.",
        },
        Step {
            title: "Vérifier avec l'IT / l'expéditeur par un autre canal",
            description: "Téléphone, chat interne, ou rencontre en personne.",
        },
        Step {
            title: "Signaler dans Gmail",
            description: "Utilisez le bouton 'Signaler un hameçonnage'.",
        },
        Step {
            title: "Supprimer l'email",
            description: "Éliminez la source de la menace.",
        },
    ]),
    Block::Callout {
        title: "Règle d'or",
        body: "Mieux vaut perdre 5 minutes à vérifier qu'une semaine à réparer les dégâts d'une cyberattaque.",
    },
    Block::Heading("Comment signaler un email suspect dans Gmail :"),
    Block::Steps(&[
        Step {
            title: "Ouvrez l'email suspect",
            description: "Sans cliquer sur les liens.",
        },
        Step {
            title: "Cliquez sur les trois points (⋮)",
            description: "En haut à droite du message.",
        },
        Step {
            title: "Sélectionnez \"Signaler un hameçonnage\"",
            description: "Gmail analysera l'email et protégera d'autres utilisateurs.",
        },
    ]),
];

const QUIZ_INTRO: &[Block] = &[Block::Paragraph(
    "Testez vos connaissances avec ce quiz de 15 questions.",
)];

const SECTIONS: &[SectionContent] = &[
    SectionContent {
        section: SectionId::Introduction,
        blocks: INTRODUCTION,
    },
    SectionContent {
        section: SectionId::Recognition,
        blocks: RECOGNITION,
    },
    SectionContent {
        section: SectionId::Examples,
        blocks: EXAMPLES_INTRO,
    },
    SectionContent {
        section: SectionId::Response,
        blocks: RESPONSE,
    },
    SectionContent {
        section: SectionId::Quiz,
        blocks: QUIZ_INTRO,
    },
];

const PHISHING_LINK: &str = "https://53e6af34.identityhorizon.com/?d=dflMacBxhDgMWyG5r0Jug";

const EXAMPLES: &[PhishingExample] = &[
    PhishingExample {
        title: "Fausse notification Google Chat",
        image: "exemple 2.JPG",
        sender: "noreply@gpolge.com",
        link: PHISHING_LINK,
        explanation: "Email de phishing imitant Google Chat. L'adresse 'gpolge.com' n'est pas Google, et le lien pointe vers un domaine frauduleux 'identityhorizon.com'. Google n'envoie jamais de notifications de cette manière.",
    },
    PhishingExample {
        title: "Faux problème de connexion",
        image: "exemple 3.JPG",
        sender: "noreply@gpolge.com",
        link: PHISHING_LINK,
        explanation: "Tentative d'imitation d'un partage Google Drive. L'adresse 'goolge.com' (avec deux 'o') n'est pas le vrai domaine Google. Le bouton 'Ouvrir' redirige vers le site malveillant.",
    },
    PhishingExample {
        title: "Fausse alerte de sécurité Google",
        image: "exemple 4.JPG",
        sender: "noreply@gpolge.com",
        link: PHISHING_LINK,
        explanation: "Email alarmiste prétendant détecter des problèmes de sécurité. Le domaine 'gpolge.com' est frauduleux, et le lien de 'vérification' mène vers le site de phishing. Google utilise des processus de sécurité différents.",
    },
    PhishingExample {
        title: "Fausse notification de connexion",
        image: "exemple 5.JPG",
        sender: "noreply@gpolge.com",
        link: PHISHING_LINK,
        explanation: "Notification de connexion frauduleuse. Bien que le format ressemble aux vraies notifications Google, l'adresse d'expédition et le lien de consultation sont suspects. Toujours vérifier dans votre compte Google directement.",
    },
    PhishingExample {
        title: "Fausse alerte de sécurité avec urgence",
        image: "exemple 6.JPG",
        sender: "noreply@gpolge.com",
        link: PHISHING_LINK,
        explanation: "Email créant un sentiment d'urgence avec '2 problèmes de sécurité détectés'. Le ton alarmiste, l'adresse frauduleuse et le lien suspect sont des signaux d'alarme typiques du phishing.",
    },
];

const SAMPLE_EMAILS: &[SampleEmail] = &[
    SampleEmail {
        from: "noreply@google.com",
        subject: "Nouveau document partagé dans Google Drive",
        body: "Bonjour,\n\nJean Dupont a partagé un document avec vous :\n\"Rapport mensuel - Mars 2024\"\n\nAccéder au document :\nhttps://drive.google.com/file/d/1BxR7YQEa8vNyH4mK9/view\n\nCe lien expirera dans 7 jours.\n\nGoogle Drive - ne pas répondre à cet email",
        is_phishing: false,
        explanation: "Email légitime de Google Drive. L'adresse est correcte, le lien pointe vers drive.google.com, et le format correspond aux notifications habituelles de partage Google Drive.",
    },
    SampleEmail {
        from: "it-support@votre-entreprise.com",
        subject: "Maintenance système - Confirmation mot de passe requise",
        body: "Bonjour,\n\nSuite à la maintenance système de cette nuit, nous devons vérifier tous les comptes utilisateurs.\n\nVeuillez confirmer votre mot de passe Google Workspace en répondant à cet email avec :\n- Votre nom d'utilisateur\n- Votre mot de passe actuel\n\nCette vérification est obligatoire avant 17h aujourd'hui.\n\nÉquipe IT",
        is_phishing: true,
        explanation: "PHISHING ! Un vrai service IT ne demande JAMAIS les mots de passe par email. C'est une règle absolue de sécurité. Toujours contacter l'IT par téléphone pour vérifier.",
    },
];

const RECOMMENDATIONS: &[&str] = &[
    "Vérifiez toujours l'expéditeur avant d'ouvrir un email",
    "Survolez les liens pour voir leur vraie destination",
    "En cas de doute, contactez l'expéditeur par un autre moyen",
    "Signalez immédiatement tout email suspect à votre IT",
    "Participez régulièrement aux formations de sécurité",
    "Maintenez vos logiciels à jour",
    "Utilisez des mots de passe forts et uniques",
    "Activez l'authentification à deux facteurs quand possible",
];

const FINAL_MESSAGE: &str = "La sécurité informatique est l'affaire de tous. Chaque employé est un maillon essentiel dans la chaîne de protection de l'entreprise. Votre vigilance et l'application de ces bonnes pratiques contribuent directement à la sécurité de tous.";

/// Static training material shown section by section and reused by the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Curriculum {
    sections: &'static [SectionContent],
    examples: &'static [PhishingExample],
    sample_emails: &'static [SampleEmail],
    recommendations: &'static [&'static str],
    final_message: &'static str,
}

impl Curriculum {
    #[must_use]
    pub fn reference() -> Self {
        Self {
            sections: SECTIONS,
            examples: EXAMPLES,
            sample_emails: SAMPLE_EMAILS,
            recommendations: RECOMMENDATIONS,
            final_message: FINAL_MESSAGE,
        }
    }

    #[must_use]
    pub fn section(&self, id: SectionId) -> Option<&SectionContent> {
        self.sections.iter().find(|s| s.section == id)
    }

    #[must_use]
    pub fn sections(&self) -> &[SectionContent] {
        self.sections
    }

    #[must_use]
    pub fn examples(&self) -> &[PhishingExample] {
        self.examples
    }

    #[must_use]
    pub fn sample_emails(&self) -> &[SampleEmail] {
        self.sample_emails
    }

    #[must_use]
    pub fn recommendations(&self) -> &[&'static str] {
        self.recommendations
    }

    #[must_use]
    pub fn final_message(&self) -> &str {
        self.final_message
    }
}

impl Default for Curriculum {
    fn default() -> Self {
        Self::reference()
    }
}
