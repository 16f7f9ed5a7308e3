//! Static label to description table for the info panel.

/// Shown in the info panel before any bone is selected.
pub const PLACEHOLDER: &str = "Click on a bone to learn more about it!";

/// Shown in place of an empty description.
pub const NO_DESCRIPTION: &str = "No description provided.";

static DESCRIPTORS: &[(&str, &str)] = &[
    (
        "Skull",
        "The skull is attached to the spinal column at the atlas. The skull actually consists of many bones all fused into one functional unit.",
    ),
    (
        "Mandible",
        "The cat mandible is small and has some peculiarities relative to the dentition (only three incisors, a prominent canine, two premolars and one molar); a conical and horizontally oriented condyle, and a protudent angular process in its ventrocaudal part.",
    ),
    (
        "Atlas",
        "The first cervical vertebra (Atlas; C1) differs considerably from other cervical vertebrae to allow free movement of the head: The atlas posses no body and is composed by two lateral masses joined by dorsal and ventral arches, constituting a bony ring for the beginning of the vertebral canal.",
    ),
    (
        "Axis",
        "The second cervical vertebra (Axis; C2) is the pivot for rotation of head and atlas (C1), so it differs from other cervical vertebrae by:\n - A cylindrical body with a well marked ventral crest \n - The dens at the cranial extremity of the body.",
    ),
    (
        "Canine",
        "Canine is a term that refers to fang-like teeth. Cats use their four large canine teeth to puncture, rip, and tear apart food or prey.",
    ),
    (
        "Cervical Vertebrae",
        "In vertebrates, cervical vertebrae are the vertebrae of the neck, immediately below the skull. All mammals have 7 cervical vertebrae (C1 to C7).\nThe first (atlas) and second (axis) cervical vertebrae differ considerably from others to allow free movement of the head.",
    ),
    (
        "Scapula",
        "The scapula, commonly known as the shoulder blade, is a flat, triangular bone that connects the humerus (upper arm bone) with the clavicle (collarbone) and forms the back part of the shoulder girdle. It serves as a critical site for muscle attachment, allowing for a wide range of shoulder and arm movements. The scapula provides stability and support to the shoulder joint while also facilitating flexibility, making it essential for locomotion and upper limb function. Its structure, including the spine, acromion, and glenoid cavity, helps anchor various muscles, such as the deltoid, trapezius, and rotator cuff muscles, which contribute to arm rotation, lifting, and extension. Additionally, the scapula plays a role in protecting vital structures like nerves and blood vessels that pass through the shoulder region.",
    ),
    (
        "Humerus",
        "The humerus is the only bone of the skeleton of the arm (thoracic stylopodium). \n\nIt is composed by three basic segments:\n - The proximal extremity, articulating with the scapula and bearing the head and the major and lesser tubercles\n- The body (shaft) bearing the deltoid tuberosity\n- The distal extremity bearing the humeral condyle and articulating with the radius and ulna",
    ),
    (
        "Radius",
        "The radius is the main load-bearing bone of the lower forelimb. Its structure is similar in most terrestrial tetrapods, but it may be fused with the ulna in some mammals and reduced or modified in animals with flippers or vestigial forelimbs.",
    ),
    (
        "Ulna",
        "The ulna is the caudolateral bone of forearm, divide into three segments:\n - Proximal extremity with the olecranon\n - Body (shaft) of ulna\n - Distal extremity with the head of ulna.",
    ),
    (
        "Carpus",
        "The carpus, or wrist, of a feline (cat) is a complex structure made up of several small bones that connect the forelimb to the metacarpus (the part of the paw above the digits). It plays a crucial role in supporting the cat's front limbs during movement and provides flexibility for activities such as walking, climbing, and pouncing.",
    ),
    (
        "Metacarpus",
        "the metacarpal bones or metacarpus, form the intermediate part of the skeletal hand located between the phalanges of the fingers and the carpal bones. The metacarpus forms part of the forefeet, and are frequently reduced in number, appropriate to the number of toes. The metacarpals are greatly extended and strengthened, forming an additional segment to the limb, a feature that typically enhances the animal's speed.",
    ),
    (
        "Phalanges",
        "The phalanges are the bones that make up the toes of the cat. They connect to each metacarpal/metatarsal bone and form the digits of the foot.",
    ),
    (
        "Thoracic Vertebrae",
        "The thoracic vertebrae in cats are part of the spine and are located in the middle section, forming the region between the neck (cervical) and lower back (lumbar). These vertebrae are responsible for providing structural support to the rib cage and protecting vital organs such as the heart and lungs.",
    ),
    (
        "Costal Cartilage",
        "The costal cartilage is the ventral cartilagenous part of the rib (opposite to the dorsal bony part). It is connected to the bony rib at the costochondral junction and articulates by its sternal extremity with the sternum (forming the sternocostal joints).",
    ),
    (
        "Lumbar Vertebrae",
        "The lumbar vertebrae in cats are the vertebrae located in the lower back region of the spine, between the thoracic (mid-back) and sacral (pelvic) regions. These vertebrae are key to supporting the cat's body weight and allowing for the flexibility and movement that are essential for activities such as running, jumping, and twisting.",
    ),
    (
        "Pelvis",
        "The pelvis in cats is the bony structure that forms the base of the spine and connects the vertebral column to the hind limbs. It serves as an anchor for the muscles of the back and legs and plays a critical role in supporting the cat's weight, enabling movement, and providing protection to vital organs in the lower abdomen.",
    ),
    (
        "Femur",
        "The femur bone spans the distance between the hip and stifle (knee) joints. Large muscle groups attach to the femur to allow flexion and extension of the rear limb. The top of the femur forms the ball in the ball and socket hip joint, while the bottom of the femur articulates with the tibia in the knee joint",
    ),
    (
        "Tibia",
        "The tibia is one of the two bones (with fibula) of the skeleton of the leg but the tibia is the only one to support the weight of the animal, which is reflected in an increase in stoutness of this bone.\n\nThe tibia is divided in 3 parts:\n- The proximal extremity with an articular surface for the tibiofemoral joint (major part of the stifle joint)\n- The body (shaft)\n- The distal extremity with its articular surface (cochlea tibiae) for the tarsocrural joint.",
    ),
    (
        "Fibula",
        "The fibula is the second bone of the skeleton of the leg: it runs along the lateral border of the tibia and does not articulate with the femur proximally.\n\nAs the tibia carries the most of the weight of animal, the fibula is reduced: this reduction differs between species but is correlated as the reduction of the ulna in the thoracic limb. For example, the fibula is reduced  in diameter but not in length in carnivores, whereas in horses the distal part of fibula is completely fused with the tibia.",
    ),
    (
        "Tarsus",
        "The tarsus in cats refers to the group of bones that make up the ankle joint and the area just above the paw (hind foot). It plays a crucial role in supporting the cat's weight and enabling movement in the hind limbs, particularly during walking, running, and jumping.\n\nAlso a compound and complex joint that is a common site of acute and chronic disease in dogs and cats",
    ),
    (
        "Calcaneum",
        "The calcaneum (or calcaneus) in cats is the heel bone, located in the tarsus (hind foot). It plays a key role in providing leverage for movement and supporting the cat's weight during locomotion. The calcaneum is part of the ankle joint and contributes to the overall flexibility and agility of the cat's hind limbs.",
    ),
    (
        "Metatarsus",
        "The metatarsus in cats is the portion of the hind limb located between the tarsus (ankle) and the digits (toes). It is analogous to the metacarpus in the forelimb, with a similar function in supporting the foot and aiding in movement. However, unlike in humans or some other mammals, the metatarsus in cats and many other carnivores does not have a thumb.",
    ),
    (
        "Sacrum",
        "The sacral vertebrae fuse together and with their ossified intervertebral discs, to form the sacrum, a single bone in all domestic species.\n\nThe cranial part of the sacrum (mainly first sacral vertebra) articulates cranially with the lumbar spine (lumbosacral joint at the lumbosacral vertebral junction) and with the pelvic girdle (sacroiliac joints). The caudal part of sacrum forms the roof of the pelvic cavity.",
    ),
    (
        "Caudal Vertebrae",
        "The caudal vertebrae (also called coccygeal vertebrae) in cats are the vertebrae located in the tail region. These vertebrae exhibit a progressive reduction in size and complexity as they move toward the tip of the tail. For cats, the caudal vertebrae are important for the function of the tail, which is a vital feature that aids in balance, communication, and agility.",
    ),
];

/// Description for `label`, or an empty string when the table has none.
///
/// Lookup is exact and case sensitive.
pub fn describe(label: &str) -> &'static str {
    DESCRIPTORS
        .iter()
        .find(|(name, _)| *name == label)
        .map(|(_, text)| *text)
        .unwrap_or("")
}

/// Every label with an entry, in table order.
pub fn labels() -> impl Iterator<Item = &'static str> {
    DESCRIPTORS.iter().map(|(name, _)| *name)
}

/// Text for the info panel body: the description, or [`NO_DESCRIPTION`].
pub fn panel_text(description: &str) -> &str {
    if description.is_empty() {
        NO_DESCRIPTION
    } else {
        description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_labels_resolve() {
        assert!(describe("Skull").starts_with("The skull is attached to the spinal column"));
        assert!(describe("Femur").contains("hip and stifle"));
        assert_eq!(labels().count(), 25);
    }

    #[test]
    fn test_unknown_labels_are_empty() {
        assert_eq!(describe("Molar"), "");
        assert_eq!(describe("skull"), "");
        assert_eq!(panel_text(describe("Teeth")), NO_DESCRIPTION);
        assert_eq!(panel_text("x"), "x");
    }

    #[test]
    fn test_labels_are_unique() {
        let mut seen: Vec<_> = labels().collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), labels().count());
    }
}
