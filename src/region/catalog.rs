//! Compiled-in exit region table (ISO 3166-1 alpha-2, as used by Tor's GeoIP)

use super::Region;

pub(super) static REGIONS: &[Region] = &[
    Region::new("AD", "Andorra"),
    Region::new("AE", "United Arab Emirates"),
    Region::new("AF", "Afghanistan"),
    Region::new("AG", "Antigua and Barbuda"),
    Region::new("AI", "Anguilla"),
    Region::new("AL", "Albania"),
    Region::new("AM", "Armenia"),
    Region::new("AO", "Angola"),
    Region::new("AQ", "Antarctica"),
    Region::new("AR", "Argentina"),
    Region::new("AS", "American Samoa"),
    Region::new("AT", "Austria"),
    Region::new("AU", "Australia"),
    Region::new("AW", "Aruba"),
    Region::new("AX", "Aland Islands"),
    Region::new("AZ", "Azerbaijan"),
    Region::new("BA", "Bosnia and Herzegovina"),
    Region::new("BB", "Barbados"),
    Region::new("BD", "Bangladesh"),
    Region::new("BE", "Belgium"),
    Region::new("BF", "Burkina Faso"),
    Region::new("BG", "Bulgaria"),
    Region::new("BH", "Bahrain"),
    Region::new("BI", "Burundi"),
    Region::new("BJ", "Benin"),
    Region::new("BL", "Saint Barthelemy"),
    Region::new("BM", "Bermuda"),
    Region::new("BN", "Brunei Darussalam"),
    Region::new("BO", "Bolivia"),
    Region::new("BQ", "Bonaire, Sint Eustatius and Saba"),
    Region::new("BR", "Brazil"),
    Region::new("BS", "Bahamas"),
    Region::new("BT", "Bhutan"),
    Region::new("BV", "Bouvet Island"),
    Region::new("BW", "Botswana"),
    Region::new("BY", "Belarus"),
    Region::new("BZ", "Belize"),
    Region::new("CA", "Canada"),
    Region::new("CC", "Cocos (Keeling) Islands"),
    Region::new("CD", "Congo, the Democratic Republic of the"),
    Region::new("CF", "Central African Republic"),
    Region::new("CG", "Congo"),
    Region::new("CH", "Switzerland"),
    Region::new("CI", "Cote d'Ivoire"),
    Region::new("CK", "Cook Islands"),
    Region::new("CL", "Chile"),
    Region::new("CM", "Cameroon"),
    Region::new("CN", "China"),
    Region::new("CO", "Colombia"),
    Region::new("CR", "Costa Rica"),
    Region::new("CU", "Cuba"),
    Region::new("CV", "Cape Verde"),
    Region::new("CW", "Curacao"),
    Region::new("CX", "Christmas Island"),
    Region::new("CY", "Cyprus"),
    Region::new("CZ", "Czech Republic"),
    Region::new("DE", "Germany"),
    Region::new("DJ", "Djibouti"),
    Region::new("DK", "Denmark"),
    Region::new("DM", "Dominica"),
    Region::new("DO", "Dominican Republic"),
    Region::new("DZ", "Algeria"),
    Region::new("EC", "Ecuador"),
    Region::new("EE", "Estonia"),
    Region::new("EG", "Egypt"),
    Region::new("EH", "Western Sahara"),
    Region::new("ER", "Eritrea"),
    Region::new("ES", "Spain"),
    Region::new("ET", "Ethiopia"),
    Region::new("FI", "Finland"),
    Region::new("FJ", "Fiji"),
    Region::new("FK", "Falkland Islands (Malvinas)"),
    Region::new("FM", "Micronesia, Federated States of"),
    Region::new("FO", "Faroe Islands"),
    Region::new("FR", "France"),
    Region::new("GA", "Gabon"),
    Region::new("GB", "United Kingdom"),
    Region::new("GD", "Grenada"),
    Region::new("GE", "Georgia"),
    Region::new("GF", "French Guiana"),
    Region::new("GG", "Guernsey"),
    Region::new("GH", "Ghana"),
    Region::new("GI", "Gibraltar"),
    Region::new("GL", "Greenland"),
    Region::new("GM", "Gambia"),
    Region::new("GN", "Guinea"),
    Region::new("GP", "Guadeloupe"),
    Region::new("GQ", "Equatorial Guinea"),
    Region::new("GR", "Greece"),
    Region::new("GS", "South Georgia and the South Sandwich Islands"),
    Region::new("GT", "Guatemala"),
    Region::new("GU", "Guam"),
    Region::new("GW", "Guinea-Bissau"),
    Region::new("GY", "Guyana"),
    Region::new("HK", "Hong Kong"),
    Region::new("HM", "Heard Island and McDonald Islands"),
    Region::new("HN", "Honduras"),
    Region::new("HR", "Croatia"),
    Region::new("HT", "Haiti"),
    Region::new("HU", "Hungary"),
    Region::new("ID", "Indonesia"),
    Region::new("IE", "Ireland"),
    Region::new("IL", "Israel"),
    Region::new("IM", "Isle of Man"),
    Region::new("IN", "India"),
    Region::new("IO", "British Indian Ocean Territory"),
    Region::new("IQ", "Iraq"),
    Region::new("IR", "Iran, Islamic Republic of"),
    Region::new("IS", "Iceland"),
    Region::new("IT", "Italy"),
    Region::new("JE", "Jersey"),
    Region::new("JM", "Jamaica"),
    Region::new("JO", "Jordan"),
    Region::new("JP", "Japan"),
    Region::new("KE", "Kenya"),
    Region::new("KG", "Kyrgyzstan"),
    Region::new("KH", "Cambodia"),
    Region::new("KI", "Kiribati"),
    Region::new("KM", "Comoros"),
    Region::new("KN", "Saint Kitts and Nevis"),
    Region::new("KP", "Korea, Democratic People's Republic of"),
    Region::new("KR", "Korea, Republic of"),
    Region::new("KW", "Kuwait"),
    Region::new("KY", "Cayman Islands"),
    Region::new("KZ", "Kazakhstan"),
    Region::new("LA", "Lao People's Democratic Republic"),
    Region::new("LB", "Lebanon"),
    Region::new("LC", "Saint Lucia"),
    Region::new("LI", "Liechtenstein"),
    Region::new("LK", "Sri Lanka"),
    Region::new("LR", "Liberia"),
    Region::new("LS", "Lesotho"),
    Region::new("LT", "Lithuania"),
    Region::new("LU", "Luxembourg"),
    Region::new("LV", "Latvia"),
    Region::new("LY", "Libya"),
    Region::new("MA", "Morocco"),
    Region::new("MC", "Monaco"),
    Region::new("MD", "Moldova, Republic of"),
    Region::new("ME", "Montenegro"),
    Region::new("MF", "Saint Martin (French part)"),
    Region::new("MG", "Madagascar"),
    Region::new("MH", "Marshall Islands"),
    Region::new("MK", "North Macedonia"),
    Region::new("ML", "Mali"),
    Region::new("MM", "Myanmar"),
    Region::new("MN", "Mongolia"),
    Region::new("MO", "Macao"),
    Region::new("MP", "Northern Mariana Islands"),
    Region::new("MQ", "Martinique"),
    Region::new("MR", "Mauritania"),
    Region::new("MS", "Montserrat"),
    Region::new("MT", "Malta"),
    Region::new("MU", "Mauritius"),
    Region::new("MV", "Maldives"),
    Region::new("MW", "Malawi"),
    Region::new("MX", "Mexico"),
    Region::new("MY", "Malaysia"),
    Region::new("MZ", "Mozambique"),
    Region::new("NA", "Namibia"),
    Region::new("NC", "New Caledonia"),
    Region::new("NE", "Niger"),
    Region::new("NF", "Norfolk Island"),
    Region::new("NG", "Nigeria"),
    Region::new("NI", "Nicaragua"),
    Region::new("NL", "Netherlands"),
    Region::new("NO", "Norway"),
    Region::new("NP", "Nepal"),
    Region::new("NR", "Nauru"),
    Region::new("NU", "Niue"),
    Region::new("NZ", "New Zealand"),
    Region::new("OM", "Oman"),
    Region::new("PA", "Panama"),
    Region::new("PE", "Peru"),
    Region::new("PF", "French Polynesia"),
    Region::new("PG", "Papua New Guinea"),
    Region::new("PH", "Philippines"),
    Region::new("PK", "Pakistan"),
    Region::new("PL", "Poland"),
    Region::new("PM", "Saint Pierre and Miquelon"),
    Region::new("PN", "Pitcairn"),
    Region::new("PR", "Puerto Rico"),
    Region::new("PS", "Palestine, State of"),
    Region::new("PT", "Portugal"),
    Region::new("PW", "Palau"),
    Region::new("PY", "Paraguay"),
    Region::new("QA", "Qatar"),
    Region::new("RE", "Reunion"),
    Region::new("RO", "Romania"),
    Region::new("RS", "Serbia"),
    Region::new("RU", "Russian Federation"),
    Region::new("RW", "Rwanda"),
    Region::new("SA", "Saudi Arabia"),
    Region::new("SB", "Solomon Islands"),
    Region::new("SC", "Seychelles"),
    Region::new("SD", "Sudan"),
    Region::new("SE", "Sweden"),
    Region::new("SG", "Singapore"),
    Region::new("SH", "Saint Helena, Ascension and Tristan da Cunha"),
    Region::new("SI", "Slovenia"),
    Region::new("SJ", "Svalbard and Jan Mayen"),
    Region::new("SK", "Slovakia"),
    Region::new("SL", "Sierra Leone"),
    Region::new("SM", "San Marino"),
    Region::new("SN", "Senegal"),
    Region::new("SO", "Somalia"),
    Region::new("SR", "Suriname"),
    Region::new("SS", "South Sudan"),
    Region::new("ST", "Sao Tome and Principe"),
    Region::new("SV", "El Salvador"),
    Region::new("SX", "Sint Maarten (Dutch part)"),
    Region::new("SY", "Syrian Arab Republic"),
    Region::new("SZ", "Eswatini"),
    Region::new("TC", "Turks and Caicos Islands"),
    Region::new("TD", "Chad"),
    Region::new("TF", "French Southern Territories"),
    Region::new("TG", "Togo"),
    Region::new("TH", "Thailand"),
    Region::new("TJ", "Tajikistan"),
    Region::new("TK", "Tokelau"),
    Region::new("TL", "Timor-Leste"),
    Region::new("TM", "Turkmenistan"),
    Region::new("TN", "Tunisia"),
    Region::new("TO", "Tonga"),
    Region::new("TR", "Turkey"),
    Region::new("TT", "Trinidad and Tobago"),
    Region::new("TV", "Tuvalu"),
    Region::new("TW", "Taiwan"),
    Region::new("TZ", "Tanzania, United Republic of"),
    Region::new("UA", "Ukraine"),
    Region::new("UG", "Uganda"),
    Region::new("UM", "United States Minor Outlying Islands"),
    Region::new("US", "United States"),
    Region::new("UY", "Uruguay"),
    Region::new("UZ", "Uzbekistan"),
    Region::new("VA", "Holy See (Vatican City State)"),
    Region::new("VC", "Saint Vincent and the Grenadines"),
    Region::new("VE", "Venezuela"),
    Region::new("VG", "Virgin Islands, British"),
    Region::new("VI", "Virgin Islands, U.S."),
    Region::new("VN", "Viet Nam"),
    Region::new("VU", "Vanuatu"),
    Region::new("WF", "Wallis and Futuna"),
    Region::new("WS", "Samoa"),
    Region::new("YE", "Yemen"),
    Region::new("YT", "Mayotte"),
    Region::new("ZA", "South Africa"),
    Region::new("ZM", "Zambia"),
    Region::new("ZW", "Zimbabwe"),
];
